use gtk4 as gtk;
use gtk4::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

use super::{Redraw, clear_box, padded_box};
use crate::app::AppContext;
use crate::catalog::{CATEGORIES, Category};
use crate::shell::Shell;

/// Tile grid: categories first, then the sub-services of the chosen one.
pub struct ServicesView {
    root: gtk::Box,
}

fn tile(title: &str, color: &str) -> gtk::Button {
    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_valign(gtk::Align::Center);
    let dot = gtk::Label::new(None);
    dot.set_markup(&format!("<span foreground=\"{}\" size=\"xx-large\">●</span>", color));
    let label = gtk::Label::new(Some(title));
    label.add_css_class("title-2");
    label.set_wrap(true);
    label.set_justify(gtk::Justification::Center);
    content.append(&dot);
    content.append(&label);

    let button = gtk::Button::new();
    button.set_child(Some(&content));
    button.add_css_class("card");
    button.set_size_request(220, 160);
    button
}

impl ServicesView {
    pub fn new(ctx: &AppContext, redraw: &Redraw) -> Self {
        let root = padded_box(gtk::Orientation::Vertical, 16, 24);
        root.set_hexpand(true);

        let header = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        let back_btn = gtk::Button::from_icon_name("go-previous-symbolic");
        back_btn.add_css_class("circular");
        back_btn.set_tooltip_text(Some("Retour"));
        let title = gtk::Label::new(Some("Services"));
        title.add_css_class("title-1");
        title.set_halign(gtk::Align::Start);
        header.append(&back_btn);
        header.append(&title);
        root.append(&header);

        let grid = gtk::FlowBox::builder()
            .selection_mode(gtk::SelectionMode::None)
            .homogeneous(true)
            .min_children_per_line(1)
            .max_children_per_line(3)
            .column_spacing(24)
            .row_spacing(24)
            .build();
        let scroller = gtk::ScrolledWindow::builder().vexpand(true).child(&grid).build();
        root.append(&scroller);

        let contacts_title = gtk::Label::new(Some("Contacts"));
        contacts_title.add_css_class("title-2");
        contacts_title.set_halign(gtk::Align::Start);
        let contacts_list = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.append(&contacts_title);
        root.append(&contacts_list);

        {
            let ctx = ctx.clone();
            let redraw_for_back = redraw.clone();
            back_btn.connect_clicked(move |_| {
                ctx.shell.borrow_mut().back_to_categories();
                redraw_for_back.emit(&ctx.shell);
            });
        }

        // Tiles are rebuilt only when the active category changes.
        let shown: Rc<Cell<Option<Option<&'static str>>>> = Rc::new(Cell::new(None));
        let ctx = ctx.clone();
        let redraw_for_tiles = redraw.clone();
        redraw.register(move |shell: &Shell| {
            let active = shell.active_category();
            let key = active.map(|c| c.id);
            if shown.get() != Some(key) {
                shown.set(Some(key));
                while let Some(child) = grid.first_child() {
                    grid.remove(&child);
                }
                match active {
                    None => {
                        title.set_label("Services");
                        for cat in &CATEGORIES {
                            grid.insert(&Self::tile_for(&ctx, &redraw_for_tiles, cat.title, cat.color, cat.id.to_string()), -1);
                        }
                    }
                    Some(cat) => {
                        title.set_label(cat.title);
                        Self::fill_sub_services(&grid, &ctx, &redraw_for_tiles, cat);
                    }
                }
                back_btn.set_visible(active.is_some());
            }

            let show_contacts = key == Some("communication");
            contacts_title.set_visible(show_contacts);
            contacts_list.set_visible(show_contacts);
            if show_contacts {
                clear_box(&contacts_list);
                for contact in shell.contacts() {
                    let row = gtk::Label::new(None);
                    row.set_markup(&format!(
                        "<b>{}</b> - {}",
                        glib::markup_escape_text(&contact.name),
                        glib::markup_escape_text(&contact.phone)
                    ));
                    row.add_css_class("title-4");
                    row.set_halign(gtk::Align::Start);
                    contacts_list.append(&row);
                }
            }
        });

        Self { root }
    }

    fn fill_sub_services(grid: &gtk::FlowBox, ctx: &AppContext, redraw: &Redraw, cat: &'static Category) {
        for sub in cat.services {
            grid.insert(&Self::tile_for(ctx, redraw, sub.title, cat.color, cat.service_id(sub)), -1);
        }
    }

    fn tile_for(ctx: &AppContext, redraw: &Redraw, title: &str, color: &str, service_id: String) -> gtk::Button {
        let button = tile(title, color);
        let ctx = ctx.clone();
        let redraw = redraw.clone();
        button.connect_clicked(move |_| {
            ctx.shell.borrow_mut().select_service(&service_id);
            // The grid re-renders; defer so this button is not destroyed mid-signal.
            let ctx = ctx.clone();
            let redraw = redraw.clone();
            glib::idle_add_local_once(move || redraw.emit(&ctx.shell));
        });
        button
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }
}
