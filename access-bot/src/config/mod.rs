//! Bot configuration: BaseConfig (listener + log) + LuisConfig (intent recognition).

mod base;
mod bot_config;
mod luis;


pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use luis::LuisConfig;
