pub mod handler;
pub mod monitoring;
pub mod utility;

use stockwatch_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    monitoring::monitor::META,
    monitoring::setchannel::META,
    monitoring::setthreshold::META,
    monitoring::stockconfig::META,
    monitoring::checkstock::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::help::help(),
        monitoring::monitor::monitor(),
        monitoring::setchannel::setchannel(),
        monitoring::setthreshold::setthreshold(),
        monitoring::stockconfig::stockconfig(),
        monitoring::checkstock::checkstock(),
    ]
}
