//! Discord bot integration.
//!
//! The bot is a serenity client carrying two layers: the poise framework dispatches
//! slash commands, while `handler::Handler` receives raw gateway events (guild
//! lifecycle, chat messages, poll menu selections). Both share the same `AppState`.
//!
//! `SerenityGateway` adapts the shared HTTP client to the `ChatGateway` trait the poll
//! engine uses for posting and refreshing poll displays.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability and removal
//! - `GUILD_MESSAGES` - Messages to match against triggers
//! - `MESSAGE_CONTENT` - Content of those messages (privileged intent)
//! - `GUILD_MEMBERS` - Member listing for `/vote notify` (privileged intent)

pub mod gateway;
pub mod handler;
pub mod start;
pub mod view;
