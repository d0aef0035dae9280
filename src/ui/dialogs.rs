use fluent_bundle::FluentArgs;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Dialog, Label, ResponseType};

use crate::i18n::I18n;

/// Modal "about" box with the version and a one-line rules summary.
pub fn show_about(parent: &ApplicationWindow, i18n: &I18n) {
    let mut args = FluentArgs::new();
    args.set("version", env!("CARGO_PKG_VERSION"));
    // Fluent keeps "\n" as two characters.
    let body = i18n.t_args("info-body", &args).replace("\\n", "\n");

    let dialog = Dialog::builder()
        .transient_for(parent)
        .modal(true)
        .destroy_with_parent(true)
        .title(i18n.t("menu-info"))
        .build();
    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    ok_btn.set_margin_start(8);
    ok_btn.set_margin_end(8);
    ok_btn.set_margin_bottom(6);

    let content = dialog.content_area();
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    let label = Label::new(Some(&body));
    label.set_wrap(true);
    label.set_justify(gtk4::Justification::Center);
    content.append(&label);

    dialog.connect_response(|dialog, _| dialog.close());
    dialog.show();
}
