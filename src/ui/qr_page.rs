use directories::UserDirs;
use gtk4 as gtk;
use gtk4::gdk_pixbuf::PixbufLoader;
use gtk4::prelude::*;
use log::{error, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Redraw, padded_box, page_header};
use crate::app::AppContext;
use crate::qr::{QR_VALIDITY_MINUTES, QrShare, owner_caption};
use crate::shell::{Page, Shell};

fn texture_from_png(bytes: &[u8]) -> Result<gtk::gdk::Texture, glib::Error> {
    let loader = PixbufLoader::new();
    loader.write(bytes)?;
    loader.close()?;
    let pixbuf = loader
        .pixbuf()
        .ok_or_else(|| glib::Error::new(glib::FileError::Failed, "empty image"))?;
    Ok(gtk::gdk::Texture::for_pixbuf(&pixbuf))
}

pub fn qr_page(ctx: &AppContext, redraw: &Redraw, overlay: &adw::ToastOverlay) -> gtk::Widget {
    let root = padded_box(gtk::Orientation::Vertical, 16, 24);
    let (header, back_btn) = page_header("Partage par QR Code");
    root.append(&header);

    let intro_title = gtk::Label::new(Some("Connectez-vous avec d'autres utilisateurs"));
    intro_title.add_css_class("title-2");
    let intro = gtk::Label::new(Some(
        "Montrez ce code à une autre personne : en le scannant, vous serez ajoutés à vos contacts respectifs.",
    ));
    intro.set_wrap(true);
    intro.add_css_class("title-4");
    root.append(&intro_title);
    root.append(&intro);

    let picture = gtk::Picture::new();
    picture.set_size_request(256, 256);
    picture.set_halign(gtk::Align::Center);
    root.append(&picture);

    let share = QrShare::new("12345");
    let owner = gtk::Label::new(None);
    owner.add_css_class("title-3");
    let validity = gtk::Label::new(Some(&format!("Valide pendant {} minutes", QR_VALIDITY_MINUTES)));
    validity.add_css_class("dim-label");
    root.append(&owner);
    root.append(&validity);

    let actions = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    actions.set_halign(gtk::Align::Center);
    let share_btn = gtk::Button::with_label("Partager");
    let download_btn = gtk::Button::with_label("Télécharger");
    share_btn.add_css_class("suggested-action");
    download_btn.set_sensitive(false);
    actions.append(&share_btn);
    actions.append(&download_btn);
    root.append(&actions);

    let instructions = gtk::Label::new(Some(
        "Instructions : montrez ce QR code à la personne avec qui vous souhaitez vous connecter. \
         Elle devra le scanner avec l'application Connecteur Social.",
    ));
    instructions.set_wrap(true);
    root.append(&instructions);

    let image: Rc<RefCell<Option<Vec<u8>>>> = Rc::new(RefCell::new(None));

    {
        let overlay = overlay.clone();
        let payload = share.payload();
        share_btn.connect_clicked(move |btn| {
            btn.clipboard().set_text(&payload);
            overlay.add_toast(adw::Toast::new("Code copié dans le presse-papiers."));
        });
    }
    {
        let overlay = overlay.clone();
        let image = image.clone();
        download_btn.connect_clicked(move |_| {
            let Some(bytes) = image.borrow().clone() else { return };
            let dir = UserDirs::new()
                .and_then(|u| u.download_dir().map(|d| d.to_path_buf()))
                .or_else(|| UserDirs::new().map(|u| u.home_dir().to_path_buf()));
            let Some(dir) = dir else {
                overlay.add_toast(adw::Toast::new("Aucun dossier de téléchargement."));
                return;
            };
            let path = dir.join("connecteur-social-qr.png");
            match std::fs::write(&path, bytes) {
                Ok(()) => {
                    info!("QR code saved to {}", path.display());
                    overlay.add_toast(adw::Toast::new(&format!("Enregistré dans {}", path.display())));
                }
                Err(e) => {
                    error!("Failed to save QR code: {}", e);
                    overlay.add_toast(adw::Toast::new("Impossible d'enregistrer l'image."));
                }
            }
        });
    }
    {
        let ctx = ctx.clone();
        let redraw = redraw.clone();
        back_btn.connect_clicked(move |_| {
            ctx.shell.borrow_mut().navigate_back();
            redraw.emit(&ctx.shell);
        });
    }

    // The name follows profile edits; the image is fetched the first time
    // the page is shown.
    let requested = Rc::new(Cell::new(false));
    let client = ctx.http.clone();
    let settings = ctx.settings.clone();
    let overlay = overlay.clone();
    redraw.register(move |shell: &Shell| {
        if shell.page() != Page::QrCode {
            return;
        }
        owner.set_label(&owner_caption(&settings.borrow().profile));
        if requested.get() {
            return;
        }
        requested.set(true);
        let share = share.clone();
        let client = client.clone();
        let picture = picture.clone();
        let download_btn = download_btn.clone();
        let image = image.clone();
        let overlay = overlay.clone();
        let requested = requested.clone();
        crate::utils::run_async_to_main(
            async move { share.fetch_image(&client).await },
            move |res| match res.map_err(|e| e.to_string()).and_then(|bytes| {
                texture_from_png(&bytes).map(|t| (t, bytes)).map_err(|e| e.to_string())
            }) {
                Ok((texture, bytes)) => {
                    picture.set_paintable(Some(&texture));
                    *image.borrow_mut() = Some(bytes);
                    download_btn.set_sensitive(true);
                }
                Err(err) => {
                    error!("QR image unavailable: {}", err);
                    requested.set(false);
                    overlay.add_toast(adw::Toast::new("Impossible de charger le QR code."));
                }
            },
        );
    });

    root.upcast()
}
