mod api;
mod app;
mod assistant;
mod catalog;
mod errors;
mod profile;
mod qr;
mod shell;
mod storage;
mod ui;
mod utils;
mod voice;

use adw::prelude::*;
use adw::Application;

fn main() -> glib::ExitCode {
    crate::utils::init_logging();
    let app = Application::builder()
        .application_id("com.example.ConnecteurSocial")
        .build();
    app.connect_activate(|app| {
        crate::app::build_ui(app);
    });
    app.run()
}
