use gtk4 as gtk;
use gtk4::prelude::*;
use log::warn;

use super::{Redraw, padded_box, page_header};
use crate::api::ProviderKind;
use crate::app::AppContext;
use crate::errors::AssistantError;
use crate::profile::ProfileField;

fn section_title(text: &str) -> gtk::Label {
    let label = gtk::Label::new(Some(text));
    label.add_css_class("title-2");
    label.set_halign(gtk::Align::Start);
    label
}

fn info_row(primary: &str, secondary: &str) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Vertical, 2);
    row.add_css_class("card");
    row.set_margin_bottom(8);
    let title = gtk::Label::new(Some(primary));
    title.add_css_class("title-4");
    title.set_halign(gtk::Align::Start);
    title.set_margin_top(8);
    title.set_margin_start(12);
    let detail = gtk::Label::new(Some(secondary));
    detail.add_css_class("dim-label");
    detail.set_halign(gtk::Align::Start);
    detail.set_margin_bottom(8);
    detail.set_margin_start(12);
    row.append(&title);
    row.append(&detail);
    row
}

fn labelled(label: &str, field: &impl IsA<gtk::Widget>) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Vertical, 4);
    let caption = gtk::Label::new(Some(label));
    caption.add_css_class("heading");
    caption.set_halign(gtk::Align::Start);
    row.append(&caption);
    row.append(field);
    row
}

fn account_tab(ctx: &AppContext) -> gtk::Box {
    let root = padded_box(gtk::Orientation::Vertical, 12, 24);
    root.append(&section_title("Informations personnelles"));
    let profile = ctx.settings.borrow().profile.clone();
    for field in ProfileField::ALL {
        let entry = gtk::Entry::new();
        entry.set_text(profile.get(field));
        entry.set_hexpand(true);
        let settings = ctx.settings.clone();
        entry.connect_changed(move |e| {
            settings.borrow_mut().profile.set(field, e.text().to_string());
        });
        root.append(&labelled(field.label(), &entry));
    }
    root
}

fn provider_status(ctx: &AppContext) -> String {
    match ctx.assistant.try_with(|s| (s.is_configured(), s.current_provider())) {
        Ok((true, provider)) => format!("Fournisseur actif : {}", provider.display_name()),
        Ok((false, _)) => "Aucun fournisseur configuré".to_string(),
        Err(_) => "Réponse en cours…".to_string(),
    }
}

fn assistant_tab(ctx: &AppContext, redraw: &Redraw, overlay: &adw::ToastOverlay) -> gtk::Box {
    let root = padded_box(gtk::Orientation::Vertical, 12, 24);
    root.append(&section_title("Assistant IA"));

    let status = gtk::Label::new(Some(&provider_status(ctx)));
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let names: Vec<&str> = ProviderKind::ALL.iter().map(|p| p.display_name()).collect();
    let dropdown = gtk::DropDown::from_strings(&names);
    if let Ok(current) = ctx.assistant.try_with(|s| s.current_provider()) {
        let pos = ProviderKind::ALL.iter().position(|p| *p == current).unwrap_or(0);
        dropdown.set_selected(pos as u32);
    }
    root.append(&labelled("Fournisseur", &dropdown));

    let key_entry = gtk::PasswordEntry::new();
    key_entry.set_show_peek_icon(true);
    key_entry.set_placeholder_text(Some("Clé API"));
    key_entry.set_hexpand(true);
    root.append(&labelled("Clé API", &key_entry));

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    buttons.set_halign(gtk::Align::End);
    let reset_btn = gtk::Button::with_label("Nouvelle conversation");
    let save_btn = gtk::Button::with_label("Enregistrer");
    save_btn.add_css_class("suggested-action");
    buttons.append(&reset_btn);
    buttons.append(&save_btn);
    root.append(&buttons);

    {
        let ctx = ctx.clone();
        let redraw = redraw.clone();
        let overlay = overlay.clone();
        let status = status.clone();
        let key_entry_for_save = key_entry.clone();
        save_btn.connect_clicked(move |_| {
            let provider = ProviderKind::ALL
                .get(dropdown.selected() as usize)
                .copied()
                .unwrap_or_default();
            let key = key_entry_for_save.text().to_string();
            let result = ctx.assistant.try_with(|s| s.set_provider(provider, &key));
            let toast = match result {
                Ok(Ok(())) => {
                    key_entry_for_save.set_text("");
                    format!("{} enregistré.", provider.display_name())
                }
                Ok(Err(AssistantError::Config(e))) => {
                    warn!("provider switched but not saved: {}", e);
                    key_entry_for_save.set_text("");
                    format!("{} activé, mais la configuration n'a pas pu être enregistrée.", provider.display_name())
                }
                Ok(Err(e)) | Err(e) => e.user_message(),
            };
            overlay.add_toast(adw::Toast::new(&toast));
            let status_read = ctx.assistant.try_with(|s| s.is_configured());
            ctx.shell.borrow_mut().sync_provider_status(status_read);
            status.set_label(&provider_status(&ctx));
            redraw.emit(&ctx.shell);
        });
    }
    {
        let ctx = ctx.clone();
        let redraw = redraw.clone();
        let overlay = overlay.clone();
        reset_btn.connect_clicked(move |_| {
            let cleared = ctx.assistant.try_with(|s| {
                let had_turns = !s.history().is_empty();
                s.clear_conversation();
                had_turns
            });
            let msg = match cleared {
                Ok(had_turns) => {
                    ctx.shell.borrow_mut().restart_conversation();
                    redraw.emit(&ctx.shell);
                    if had_turns {
                        "L'assistant repart d'une conversation vierge.".to_string()
                    } else {
                        "La conversation est déjà vierge.".to_string()
                    }
                }
                Err(e) => e.user_message(),
            };
            overlay.add_toast(adw::Toast::new(&msg));
        });
    }
    root
}

fn keys_tab(ctx: &AppContext) -> gtk::Box {
    let root = padded_box(gtk::Orientation::Vertical, 12, 24);
    root.append(&section_title("Clés des services"));
    for key in &ctx.settings.borrow().third_party_keys {
        let entry = gtk::Entry::new();
        entry.set_text(&key.masked_key);
        entry.set_editable(false);
        root.append(&labelled(&key.service, &entry));
    }
    root
}

fn emergency_tab(ctx: &AppContext) -> gtk::Box {
    let root = padded_box(gtk::Orientation::Vertical, 12, 24);
    root.append(&section_title("Contacts d'urgence"));
    for contact in &ctx.settings.borrow().emergency_contacts {
        root.append(&info_row(
            &contact.name,
            &format!("{} · {}", contact.relation, contact.phone),
        ));
    }
    root
}

fn medical_tab(ctx: &AppContext) -> gtk::Box {
    let root = padded_box(gtk::Orientation::Vertical, 12, 24);
    let settings = ctx.settings.borrow();
    let medical = &settings.medical;

    root.append(&section_title("Mes médecins"));
    for doctor in &medical.doctors {
        root.append(&info_row(&doctor.name, &format!("{} · {}", doctor.specialty, doctor.phone)));
    }
    root.append(&section_title("Mes médicaments"));
    for med in &medical.medications {
        root.append(&info_row(&format!("{} {}", med.name, med.dosage), &med.frequency));
    }
    root.append(&section_title("Mes rendez-vous"));
    for rdv in &medical.appointments {
        root.append(&info_row(
            &format!("{} à {}", rdv.date, rdv.time),
            &format!("{} · {}", rdv.doctor, rdv.place),
        ));
    }
    root
}

pub fn settings_page(ctx: &AppContext, redraw: &Redraw, overlay: &adw::ToastOverlay) -> gtk::Widget {
    let root = padded_box(gtk::Orientation::Vertical, 16, 24);
    let (header, back_btn) = page_header("Paramètres");
    root.append(&header);

    let notebook = gtk::Notebook::new();
    notebook.set_vexpand(true);
    let tabs: [(&str, gtk::Box); 5] = [
        ("Compte", account_tab(ctx)),
        ("Assistant IA", assistant_tab(ctx, redraw, overlay)),
        ("Clés API", keys_tab(ctx)),
        ("Contacts d'urgence", emergency_tab(ctx)),
        ("Médical", medical_tab(ctx)),
    ];
    for (label, content) in tabs {
        let scroller = gtk::ScrolledWindow::builder().child(&content).build();
        notebook.append_page(&scroller, Some(&gtk::Label::new(Some(label))));
    }
    root.append(&notebook);

    {
        let ctx = ctx.clone();
        let redraw = redraw.clone();
        back_btn.connect_clicked(move |_| {
            ctx.shell.borrow_mut().navigate_back();
            redraw.emit(&ctx.shell);
        });
    }

    root.upcast()
}
