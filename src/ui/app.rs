use std::cell::{Cell as Flag, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use gtk4::gdk::Display;
use gtk4::gio::{Menu, SimpleAction};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, AspectFrame, Box as GtkBox, Button, CssProvider, HeaderBar,
    Label, MenuButton, Orientation, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use super::board;
use super::dialogs;
use super::resources::GameResources;
use super::rendering::REF_SIZE;
use super::session::Session;
use super::sound::SoundCues;
use crate::ai::RandomPicker;
use crate::game::logic::GameController;
use crate::i18n::I18n;
use crate::storage::{self, Settings};

/// Startup options after merging command-line flags over saved settings.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub resources_dir: PathBuf,
    pub seed: Option<u64>,
    pub bot_delay_ms: Option<u64>,
    pub mute: bool,
}

fn persist(settings: &Settings) {
    if let Err(e) = storage::save_settings(settings) {
        tracing::warn!(error = %e, "could not save settings");
    }
}

/// Build and present the main application window.
pub fn build_ui(app: &Application, opts: &LaunchOptions) {
    // ── Shared state ──
    let settings = Rc::new(RefCell::new(storage::load_settings()));
    let bot_delay = Duration::from_millis(
        opts.bot_delay_ms
            .unwrap_or_else(|| settings.borrow().bot_delay_ms),
    );
    let sound_on = Rc::new(Flag::new(settings.borrow().sound_enabled && !opts.mute));

    let resources = Rc::new(GameResources::load(&opts.resources_dir));
    let i18n = Rc::new(I18n::load_from_dir(&opts.resources_dir));
    let sounds = SoundCues::load(&resources.dir().join("sounds"), sound_on.clone());
    let picker = match opts.seed {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::from_entropy(),
    };
    let game = GameController::new(Box::new(picker), Box::new(sounds));
    tracing::info!(
        delay_ms = bot_delay.as_millis() as u64,
        seed = ?opts.seed,
        sound = sound_on.get(),
        "starting game"
    );

    // ── CSS ──
    let provider = CssProvider::new();
    let css = "
        .title-label   { font-weight: 700; font-size: 15px; }
        .banner        { font-weight: 700; font-size: 20px; margin: 8px; }
        .restart       { margin: 8px 40px 12px 40px; }
    ";
    provider.load_from_data(css);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    // ── Window ──
    let window = ApplicationWindow::builder()
        .application(app)
        .title(i18n.t("app-title"))
        .default_width(420)
        .default_height(520)
        .resizable(true)
        .build();
    {
        let s = settings.borrow();
        if let (Some(w), Some(h)) = (s.window_width, s.window_height) {
            window.set_default_size(w, h);
        }
    }

    // ── Header bar ──
    let header = HeaderBar::new();
    header.set_show_title_buttons(true);
    let header_title = Label::new(Some(&i18n.t("app-title")));
    header_title.add_css_class("title-label");
    header.set_title_widget(Some(&header_title));

    let menu = Menu::new();
    menu.append(Some(&i18n.t("menu-new-game")), Some("win.new-game"));
    menu.append(Some(&i18n.t("menu-sound")), Some("win.sound"));
    let section2 = Menu::new();
    section2.append(Some(&i18n.t("menu-info")), Some("win.info"));
    menu.append_section(None, &section2);

    let menu_button = MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    // ── Main layout ──
    let main_box = GtkBox::new(Orientation::Vertical, 0);

    let banner = Label::new(None);
    banner.add_css_class("banner");
    main_box.append(&banner);

    let drawing_area = board::create_board();
    let aspect_frame = AspectFrame::new(0.5, 0.5, 1.0, false);
    aspect_frame.set_child(Some(&drawing_area));
    aspect_frame.set_hexpand(true);
    aspect_frame.set_vexpand(true);
    aspect_frame.set_size_request(REF_SIZE as i32 / 2, REF_SIZE as i32 / 2);
    main_box.append(&aspect_frame);

    let restart_button = Button::with_label(&i18n.t("button-restart"));
    restart_button.add_css_class("restart");
    main_box.append(&restart_button);

    let session = Session::new(game, bot_delay, i18n.clone(), banner, drawing_area.clone());
    board::connect_board(&drawing_area, session.clone(), resources);

    // ── Actions ──
    {
        let session = session.clone();
        restart_button.connect_clicked(move |_| session.restart());
    }

    // New game
    {
        let action = SimpleAction::new("new-game", None);
        let session = session.clone();
        action.connect_activate(move |_, _| session.restart());
        window.add_action(&action);
    }

    // Sound toggle (shown as a check item)
    {
        let action = SimpleAction::new_stateful("sound", None, sound_on.get().to_variant());
        let settings = settings.clone();
        action.connect_activate(move |action, _| {
            let on = !sound_on.get();
            sound_on.set(on);
            action.set_state(on.to_variant());
            let mut s = settings.borrow_mut();
            s.sound_enabled = on;
            persist(&s);
        });
        window.add_action(&action);
    }

    // Info
    {
        let action = SimpleAction::new("info", None);
        let win_for_closure = window.clone();
        action.connect_activate(move |_, _| {
            dialogs::show_about(&win_for_closure, &i18n);
        });
        window.add_action(&action);
    }

    window.set_titlebar(Some(&header));
    window.set_child(Some(&main_box));

    // Remember the window size for the next start.
    window.connect_close_request(move |win| {
        let mut s = settings.borrow_mut();
        s.window_width = Some(win.width());
        s.window_height = Some(win.height());
        persist(&s);
        gtk4::Inhibit(false)
    });

    window.present();
}
