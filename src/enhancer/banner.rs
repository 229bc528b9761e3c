use crate::page::{ConsoleEntry, Page};

const BANNER: &str = "
███████╗███████╗██████╗ ██████╗  █████╗ ██████╗ ██╗
██╔════╝██╔════╝██╔══██╗██╔══██╗██╔══██╗██╔══██╗██║
█████╗  █████╗  ██████╔╝██████╔╝███████║██████╔╝██║
██╔══╝  ██╔══╝  ██╔══██╗██╔══██╗██╔══██║██╔══██╗██║
██║     ███████╗██║  ██║██║  ██║██║  ██║██║  ██║██║
╚═╝     ╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝
Course Registration System - Powered by Spring Boot
";
const BANNER_STYLE: &str = "color: #DC0000; font-weight: bold;";

const TAGLINE: &str = "Forza Ferrari! 🏎️💨";
const TAGLINE_STYLE: &str = "color: #FFF200; font-size: 20px; font-weight: bold;";

impl Page {
    pub(super) fn print_console_banner(&mut self) {
        for (message, style) in [(BANNER, BANNER_STYLE), (TAGLINE, TAGLINE_STYLE)] {
            log::info!("{message}");
            self.console.push(ConsoleEntry {
                message: message.to_string(),
                style: style.to_string(),
            });
        }
    }
}
