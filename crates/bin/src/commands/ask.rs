//! Ask command - runs one chat line through the interpreter.

use std::time::Duration;

use chainpad::{
    Aggregator, FeatureMode,
    chat::{ChatMessage, HttpChatApi, respond},
};

use crate::cli::AskArgs;

pub async fn run(args: &AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = args.text.join(" ");
    let mode: FeatureMode = args.mode.into();

    let reply: ChatMessage = match &args.server {
        Some(server) => {
            let api = HttpChatApi::new(server, Duration::from_secs(args.timeout))?;
            respond(&api, mode, &text).await
        }
        None => {
            let aggregator = Aggregator::from_config(&args.upstream.to_config()?)?;
            respond(&aggregator, mode, &text).await
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}
