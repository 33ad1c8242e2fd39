//! Reporting of unhandled turn errors back to the user.

use bot_core::{Activity, BotError, Result, TurnContext};

pub const TURN_ERROR_MESSAGE: &str = "The bot encountered an error or bug.";
pub const TURN_ERROR_FIX_MESSAGE: &str =
    "To continue to run this bot, please fix the bot source code.";

const TRACE_CHANNEL: &str = "emulator";

/// Sends the error trace (emulator only) followed by the two fixed failure messages.
pub async fn report_turn_error(turn: &TurnContext, error: &BotError) -> Result<()> {
    if turn.activity().channel() == TRACE_CHANNEL {
        turn.send_activity(Activity::trace(
            "OnTurnError Trace",
            serde_json::Value::String(error.to_string()),
            "https://www.botframework.com/schemas/error",
            "TurnError",
        ))
        .await?;
    }
    turn.send_text(TURN_ERROR_MESSAGE).await?;
    turn.send_text(TURN_ERROR_FIX_MESSAGE).await?;
    Ok(())
}
