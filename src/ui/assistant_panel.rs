use gtk4 as gtk;
use gtk4::prelude::*;
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

use super::{Redraw, clear_box, padded_box};
use crate::app::AppContext;
use crate::shell::{Message, Shell, Submission};
use crate::voice::CAPTURE_DURATION;

/// Message log, text entry, simulated microphone and send button.
pub struct AssistantPanel {
    root: gtk::Box,
}

fn bubble(message: &Message) -> gtk::Widget {
    let label = gtk::Label::new(Some(&message.text));
    label.set_wrap(true);
    label.set_max_width_chars(40);
    label.set_xalign(0.0);
    label.add_css_class("title-4");
    label.set_margin_top(10);
    label.set_margin_bottom(10);
    label.set_margin_start(14);
    label.set_margin_end(14);

    let frame = gtk::Frame::new(None);
    frame.set_child(Some(&label));
    frame.add_css_class("card");
    if message.is_user {
        frame.set_halign(gtk::Align::End);
        frame.add_css_class("accent");
    } else {
        frame.set_halign(gtk::Align::Start);
    }
    frame.upcast()
}

impl AssistantPanel {
    pub fn new(ctx: &AppContext, redraw: &Redraw) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
        root.set_width_request(420);

        let title = gtk::Label::new(Some("Assistant"));
        title.add_css_class("title-1");
        title.set_halign(gtk::Align::Start);
        let title_bar = padded_box(gtk::Orientation::Horizontal, 0, 16);
        title_bar.append(&title);
        root.append(&title_bar);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .hscrollbar_policy(gtk::PolicyType::Never)
            .build();
        let messages_box = padded_box(gtk::Orientation::Vertical, 12, 16);
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        let status = gtk::Label::new(None);
        status.add_css_class("dim-label");
        status.set_wrap(true);
        status.set_margin_start(16);
        status.set_margin_end(16);
        root.append(&status);

        // Input row
        let input_row = padded_box(gtk::Orientation::Horizontal, 8, 12);
        let mic_btn = gtk::Button::from_icon_name("audio-input-microphone-symbolic");
        mic_btn.add_css_class("circular");
        mic_btn.set_tooltip_text(Some("Saisie vocale"));
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Tapez votre message…"));
        let send_btn = gtk::Button::from_icon_name("mail-send-symbolic");
        send_btn.add_css_class("circular");
        send_btn.add_css_class("suggested-action");
        send_btn.set_tooltip_text(Some("Envoyer"));
        input_row.append(&mic_btn);
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        // Log is append-only, so only new entries are added on redraw.
        let rendered = Rc::new(Cell::new(0usize));
        {
            let messages_box = messages_box.clone();
            let scroller = scroller.clone();
            let entry = entry.clone();
            let mic_btn = mic_btn.clone();
            let send_btn = send_btn.clone();
            let status = status.clone();
            redraw.register(move |shell: &Shell| {
                let messages = shell.messages();
                if messages.len() < rendered.get() {
                    clear_box(&messages_box);
                    rendered.set(0);
                }
                if messages.len() > rendered.get() {
                    for message in &messages[rendered.get()..] {
                        messages_box.append(&bubble(message));
                    }
                    rendered.set(messages.len());
                    let adj = scroller.vadjustment();
                    adj.set_value(adj.upper());
                }

                let enabled = shell.controls_enabled();
                entry.set_sensitive(enabled);
                mic_btn.set_sensitive(enabled);
                send_btn.set_sensitive(enabled);
                if shell.voice.is_listening() {
                    mic_btn.add_css_class("destructive-action");
                } else {
                    mic_btn.remove_css_class("destructive-action");
                }
                if !enabled && shell.send_state() == crate::shell::SendState::Idle {
                    status.set_label("Configurez un fournisseur d'IA dans les paramètres pour discuter.");
                    status.set_visible(true);
                } else {
                    status.set_visible(false);
                }
            });
        }

        // Send actions
        {
            let ctx = ctx.clone();
            let redraw = redraw.clone();
            let entry_for_send = entry.clone();
            let send: Rc<dyn Fn()> = Rc::new(move || {
                let text = entry_for_send.text().to_string();
                let submission = ctx.shell.borrow_mut().submit(&text);
                match submission {
                    Submission::Ignored => return,
                    Submission::Handled => {}
                    Submission::Dispatch(text) => {
                        debug!("dispatching message to assistant");
                        match ctx.assistant.begin_send(text) {
                            Ok(pending) => {
                                let shell = ctx.shell.clone();
                                let redraw = redraw.clone();
                                crate::utils::run_async_to_main(pending.run(), move |res| {
                                    shell.borrow_mut().finish_send(res);
                                    redraw.emit(&shell);
                                });
                            }
                            Err(e) => ctx.shell.borrow_mut().finish_send(Err(e)),
                        }
                    }
                }
                entry_for_send.set_text("");
                redraw.emit(&ctx.shell);
            });
            {
                let send = send.clone();
                send_btn.connect_clicked(move |_| (send)());
            }
            {
                let send = send.clone();
                entry.connect_activate(move |_| (send)());
            }
        }

        // Simulated voice capture
        {
            let ctx = ctx.clone();
            let redraw = redraw.clone();
            let entry = entry.clone();
            mic_btn.connect_clicked(move |_| {
                let capture = ctx.shell.borrow_mut().voice.toggle();
                redraw.emit(&ctx.shell);
                let Some(capture) = capture else { return };
                let shell = ctx.shell.clone();
                let redraw = redraw.clone();
                let entry = entry.clone();
                glib::timeout_add_local_once(CAPTURE_DURATION, move || {
                    let transcript = shell.borrow_mut().voice.finish(capture);
                    if let Some(transcript) = transcript {
                        entry.set_text(transcript);
                    }
                    redraw.emit(&shell);
                });
            });
        }

        Self { root }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }
}
