//! Configuration section definitions.

mod css;
mod html;
mod js;
mod watch;

pub use css::{CssConfig, CssTarget};
pub use html::HtmlConfig;
pub use js::JsConfig;
pub use watch::WatchConfig;
