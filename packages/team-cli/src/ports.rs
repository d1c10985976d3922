//! Terminal implementations of the page-side ports.

use team_actions::{BaseNavigator, BaseNotifier, BasePanelView};
use tracing::warn;

pub struct StdoutNavigator;

impl BaseNavigator for StdoutNavigator {
    fn navigate(&self, route: &str) {
        println!("navigate: {route}");
    }

    fn redirect(&self, url: &str) {
        println!("redirect: {url}");
    }
}

pub struct StderrNotifier;

impl BaseNotifier for StderrNotifier {
    fn show_error(&self, message: &str) {
        warn!(error = message, "Error shown to user");
        eprintln!("error: {message}");
    }
}

pub struct StdoutPanelView;

impl BasePanelView for StdoutPanelView {
    fn set_html(&self, html: &str) {
        println!("{html}");
    }
}
