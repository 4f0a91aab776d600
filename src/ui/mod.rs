pub mod assistant_panel;
pub mod main_window;
pub mod qr_page;
pub mod services;
pub mod settings;

use gtk4 as gtk;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::shell::Shell;

/// Views that re-render from the shell state after every change.
#[derive(Clone, Default)]
pub struct Redraw {
    views: Rc<RefCell<Vec<Rc<dyn Fn(&Shell)>>>>,
}

impl Redraw {
    pub fn register(&self, view: impl Fn(&Shell) + 'static) {
        self.views.borrow_mut().push(Rc::new(view));
    }

    /// Views only read the shell; the borrow is shared for the whole pass.
    pub fn emit(&self, shell: &RefCell<Shell>) {
        let views = self.views.borrow().clone();
        let shell = shell.borrow();
        for view in views {
            view(&shell);
        }
    }
}

pub(crate) fn padded_box(orientation: gtk::Orientation, spacing: i32, margin: i32) -> gtk::Box {
    let root = gtk::Box::new(orientation, spacing);
    root.set_margin_top(margin);
    root.set_margin_bottom(margin);
    root.set_margin_start(margin);
    root.set_margin_end(margin);
    root
}

/// Round back button followed by a page title.
pub(crate) fn page_header(title: &str) -> (gtk::Box, gtk::Button) {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    let back = gtk::Button::from_icon_name("go-previous-symbolic");
    back.add_css_class("circular");
    back.set_tooltip_text(Some("Retour"));
    let label = gtk::Label::new(Some(title));
    label.add_css_class("title-1");
    label.set_halign(gtk::Align::Start);
    row.append(&back);
    row.append(&label);
    (row, back)
}

/// Remove every child of a box.
pub(crate) fn clear_box(container: &gtk::Box) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }
}
