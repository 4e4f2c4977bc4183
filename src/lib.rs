//! Interactive SVG widget engine.
//!
//! This crate is compiled to WebAssembly and embedded in a host page, and it
//! also builds natively for the command line and for tests. It owns the full
//! lifecycle of one widget: parsing the SVG, classifying elements as
//! selectable or buttons, selection and hover highlighting through an overlay
//! layer, debounced hover and click notifications, pan and zoom of the view
//! box, runtime style and structure commands, and SVG/PNG export. The host
//! JavaScript layer only wires DOM events to [`bindings::SvgWidget`], swaps in
//! the rendered markup and forwards the resulting [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`] stream |
//! | [`bindings`] | `wasm-bindgen` surface for the host page |
//! | [`config`] | JSON configuration and data-frame shaped tables |
//! | [`doc`] | Owned, mutable SVG element tree |
//! | [`index`] | Element roles, titles and selectable groups |
//! | [`hit`] | Resolving pointer targets against roles |
//! | [`selection`] | Click and programmatic selection rules |
//! | [`hover`] | Hover tracking and the tooltip |
//! | [`button`] | Single/double click discrimination for buttons |
//! | [`overlay`] | Highlight clones drawn above the content |
//! | [`styling`] | Style and attribute batches |
//! | [`viewport`] | View box, zoom and pan |
//! | [`transform`] | Affine transforms and screen/content mapping |
//! | [`schedule`] | Virtual-clock timers |
//! | [`input`] | Input event types and the pointer gesture state |
//! | [`layout`] | Content bounding-box measurement |
//! | [`render`] | Markup views of the document |
//! | [`export`] | SVG and PNG downloads |
//! | [`consts`] | Shared constants (zoom limits, timeouts, overlay ids) |

pub mod bindings;
pub mod button;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod hit;
pub mod hover;
pub mod index;
pub mod input;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod schedule;
pub mod selection;
pub mod styling;
pub mod transform;
pub mod viewport;
