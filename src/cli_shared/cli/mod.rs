// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod config;

pub use config::*;

use std::io::IsTerminal as _;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LoggingColor {
    Always,
    #[default]
    Auto,
    Never,
}

impl LoggingColor {
    pub fn coloring_enabled(&self) -> bool {
        match self {
            LoggingColor::Auto => std::io::stderr().is_terminal(),
            LoggingColor::Always => true,
            LoggingColor::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_logging_color() {
        assert_eq!("always".parse::<LoggingColor>().unwrap(), LoggingColor::Always);
        assert_eq!("auto".parse::<LoggingColor>().unwrap(), LoggingColor::Auto);
        assert_eq!("never".parse::<LoggingColor>().unwrap(), LoggingColor::Never);
        assert!("sometimes".parse::<LoggingColor>().is_err());
        assert!(LoggingColor::Always.coloring_enabled());
        assert!(!LoggingColor::Never.coloring_enabled());
    }
}
