use adw::Application;
use adw::prelude::*;

use super::Redraw;
use super::assistant_panel::AssistantPanel;
use super::services::ServicesView;
use crate::app::AppContext;
use crate::shell::{Page, Shell};

fn page_name(page: Page) -> &'static str {
    match page {
        Page::Main => "main",
        Page::Settings => "settings",
        Page::QrCode => "qrcode",
    }
}

pub fn show_main_window(app: &Application, ctx: AppContext) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Connecteur Social")
        .default_width(1280)
        .default_height(800)
        .build();

    let overlay = adw::ToastOverlay::new();
    let redraw = Redraw::default();

    let main_page = gtk4::Box::new(gtk4::Orientation::Horizontal, 0);
    let panel = AssistantPanel::new(&ctx, &redraw);
    let services = ServicesView::new(&ctx, &redraw);
    main_page.append(&panel.widget());
    main_page.append(&gtk4::Separator::new(gtk4::Orientation::Vertical));
    main_page.append(&services.widget());

    let stack = gtk4::Stack::builder()
        .transition_type(gtk4::StackTransitionType::Crossfade)
        .vexpand(true)
        .build();
    stack.add_named(&main_page, Some(page_name(Page::Main)));
    stack.add_named(
        &crate::ui::settings::settings_page(&ctx, &redraw, &overlay),
        Some(page_name(Page::Settings)),
    );
    stack.add_named(
        &crate::ui::qr_page::qr_page(&ctx, &redraw, &overlay),
        Some(page_name(Page::QrCode)),
    );
    overlay.set_child(Some(&stack));

    {
        let stack = stack.clone();
        redraw.register(move |shell: &Shell| {
            stack.set_visible_child_name(page_name(shell.page()));
        });
    }

    let container = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk4::Label::new(Some("Connecteur Social"));
    title.add_css_class("title-2");
    header.set_title_widget(Some(&title));

    let settings_btn = gtk4::Button::from_icon_name("emblem-system-symbolic");
    settings_btn.set_tooltip_text(Some("Paramètres"));
    let qr_btn = gtk4::Button::from_icon_name("view-grid-symbolic");
    qr_btn.set_tooltip_text(Some("Partager (QR Code)"));
    header.pack_end(&settings_btn);
    header.pack_end(&qr_btn);

    for (button, page) in [(&settings_btn, Page::Settings), (&qr_btn, Page::QrCode)] {
        let ctx = ctx.clone();
        let redraw = redraw.clone();
        button.connect_clicked(move |_| {
            ctx.shell.borrow_mut().navigate_to(page);
            redraw.emit(&ctx.shell);
        });
    }

    let footer = gtk4::Label::new(Some("Connecteur Social Senior-Tech © 2025 Zaug Johnny"));
    footer.add_css_class("dim-label");
    footer.set_margin_top(8);
    footer.set_margin_bottom(8);

    container.append(&header);
    container.append(&overlay);
    container.append(&footer);
    window.set_content(Some(&container));

    redraw.emit(&ctx.shell);
    window.present();
}
