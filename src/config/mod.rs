pub mod locator;
pub mod params;
pub mod schema;

pub use locator::Locator;
pub use params::{ParamDef, Params};
pub use schema::{
    BrowserConfig, Condition, Config, LogConfig, LoginConfig, SuccessCondition, TargetUrl,
    WatchConfig, WindowSize,
};
