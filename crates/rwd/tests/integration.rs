//! End-to-end behaviour of the helper against the headless window

use std::cell::RefCell;
use std::rc::Rc;

use rwd::{
    CodeBlockCallbacks, Host, PictureEvent, PictureOptions, Rwd, RwdError, Selection, SwapEvent,
    Window,
};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Responsive</title>
    <link rel="stylesheet" href="small.css" data-name="small" media="only screen and (max-width: 599px)">
    <link rel="stylesheet" href="medium.css" data-name="medium" media="only screen and (min-width: 600px) and (max-width: 1023px)">
    <link rel="stylesheet" href="large.css" data-name="large" media="only screen and (min-width: 1024px)">
    <link rel="stylesheet" href="base.css">
</head>
<body>
    <picture id="hero" class="responsive" alt="Mountains">
        <source data-media="large" srcset="large.jpg 1x, large@2x.jpg 2x">
        <source data-media="medium" src="medium.jpg">
        <source data-media="small" src="small.jpg">
    </picture>
    <picture id="logo" class="responsive">
        <source media="(min-width: 1px)" srcset="logo.png, logo@2x.png 2x">
    </picture>
    <div id="content" class="responsive"></div>
</body>
</html>"#;

type Log = Rc<RefCell<Vec<String>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn window(width: u32) -> Window {
    let mut window = Window::from_html(PAGE, width, 800).unwrap();
    for (url, w, h) in [
        ("large.jpg", 1600, 900),
        ("large@2x.jpg", 3200, 1800),
        ("medium.jpg", 1000, 600),
        ("small.jpg", 500, 300),
        ("logo.png", 120, 40),
        ("logo@2x.png", 240, 80),
    ] {
        window.add_image(url, w, h);
    }
    window
}

fn setup(width: u32) -> Rwd {
    init_tracing();
    let mut rwd = Rwd::new(window(width));
    rwd.init();
    rwd
}

fn node(rwd: &Rwd, id: &str) -> rwd_dom::NodeId {
    rwd.host().document().get_element_by_id(id).unwrap()
}

fn src(rwd: &Rwd, id: &str) -> String {
    let doc = rwd.host().document();
    let img = doc.tree().get_elements_by_tag_name(node(rwd, id), "img");
    img.first()
        .and_then(|&img| doc.get_attribute(img, "src"))
        .unwrap_or("")
        .to_string()
}

fn record(log: &Log) -> impl Fn(&SwapEvent) -> anyhow::Result<()> + 'static {
    let log = log.clone();
    move |e: &SwapEvent| {
        log.borrow_mut().push(format!("{}:{}", e.event.hook_name(), e.url));
        Ok(())
    }
}

fn recorder(log: &Log) -> PictureOptions {
    PictureOptions::new()
        .before(record(log))
        .after(record(log))
        .loadonce(record(log))
        .load(record(log))
}

fn code_logger(log: &Log, tag: &'static str) -> impl Fn(&str, Option<&str>) -> anyhow::Result<()> + 'static {
    let log = log.clone();
    move |name: &str, _media: Option<&str>| {
        log.borrow_mut().push(format!("{tag}:{name}"));
        Ok(())
    }
}

#[test]
fn test_init_discovers_breakpoints() {
    let rwd = setup(700);

    let names: Vec<_> = rwd.breakpoints().iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["small", "medium", "large"]);
    assert_eq!(rwd.breakpoint(), Some("medium"));
    assert_eq!(rwd.host().resize_listener_count(), 1);
}

#[test]
fn test_active_breakpoint_kept_when_nothing_matches() {
    init_tracing();
    let html = r#"<head><link data-name="tiny" media="(max-width: 100px)"></head><body></body>"#;
    let mut rwd = Rwd::new(Window::from_html(html, 800, 600).unwrap());
    rwd.init();
    assert_eq!(rwd.breakpoint(), None);

    rwd.host_mut().resize(80, 600);
    rwd.pump().unwrap();
    assert_eq!(rwd.breakpoint(), Some("tiny"));

    rwd.host_mut().resize(800, 600);
    rwd.pump().unwrap();
    assert_eq!(rwd.breakpoint(), Some("tiny"));
}

#[test]
fn test_register_runs_synchronously() {
    let mut rwd = setup(400);
    let log: Log = Rc::default();

    rwd.register("small", CodeBlockCallbacks::new().on_match(code_logger(&log, "match")))
        .unwrap();
    assert_eq!(*log.borrow(), vec!["match:small"]);

    rwd.register("large", CodeBlockCallbacks::new().on_unmatch(code_logger(&log, "unmatch")))
        .unwrap();
    assert_eq!(*log.borrow(), vec!["match:small", "unmatch:large"]);
}

#[test]
fn test_resize_runs_code_blocks_on_change_only() {
    let mut rwd = setup(400);
    let log: Log = Rc::default();
    let callbacks = CodeBlockCallbacks::new()
        .on_match(code_logger(&log, "match"))
        .on_unmatch(code_logger(&log, "unmatch"));
    rwd.register("small", callbacks).unwrap();
    log.borrow_mut().clear();

    // Same breakpoint, no code runs
    rwd.host_mut().resize(500, 800);
    assert_eq!(rwd.pump().unwrap(), 1);
    assert!(log.borrow().is_empty());

    rwd.host_mut().resize(1200, 800);
    rwd.pump().unwrap();
    assert_eq!(rwd.breakpoint(), Some("large"));
    assert_eq!(*log.borrow(), vec!["unmatch:small"]);

    rwd.host_mut().resize(320, 800);
    rwd.pump().unwrap();
    assert_eq!(*log.borrow(), vec!["unmatch:small", "match:small"]);
}

#[test]
fn test_picture_lifecycle() {
    let mut rwd = setup(700);
    let log: Log = Rc::default();
    let hero = node(&rwd, "hero");

    assert_eq!(rwd.picture(&[hero], recorder(&log)).unwrap(), 1);
    assert_eq!(*log.borrow(), vec!["before:medium.jpg", "after:medium.jpg"]);
    assert_eq!(src(&rwd, "hero"), "medium.jpg");

    rwd.pump().unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["before:medium.jpg", "after:medium.jpg", "loadonce:medium.jpg", "load:medium.jpg"]
    );

    let doc = rwd.host().document();
    let img = doc.tree().get_elements_by_tag_name(hero, "img")[0];
    assert_eq!(doc.get_attribute(img, "alt"), Some("Mountains"));
    assert_eq!(doc.get_attribute(img, "width"), Some("1000"));
    assert_eq!(doc.get_attribute(img, "height"), Some("600"));
}

#[test]
fn test_first_load_fires_once() {
    let mut rwd = setup(700);
    let log: Log = Rc::default();
    let hero = node(&rwd, "hero");
    rwd.picture(&[hero], recorder(&log)).unwrap();
    rwd.pump().unwrap();

    for width in [1200, 400, 800] {
        rwd.host_mut().resize(width, 800);
        rwd.pump().unwrap();
    }

    let count = |prefix: &str| log.borrow().iter().filter(|e| e.starts_with(prefix)).count();
    assert_eq!(count("loadonce:"), 1);
    assert_eq!(count("load:"), 4);
    assert_eq!(src(&rwd, "hero"), "medium.jpg");
    assert!(rwd.pictures().get(0).unwrap().first_load_fired());
}

#[test]
fn test_unchanged_source_does_nothing() {
    let mut rwd = setup(700);
    let log: Log = Rc::default();
    let hero = node(&rwd, "hero");
    rwd.picture(&[hero], recorder(&log)).unwrap();
    rwd.pump().unwrap();
    let seen = log.borrow().len();

    rwd.host_mut().resize(900, 800);
    rwd.pump().unwrap();

    assert_eq!(log.borrow().len(), seen);
    assert_eq!(rwd.host().fetches(), ["medium.jpg"]);
}

#[test]
fn test_density_selection() {
    for (ratio, expected, width) in [
        (1.0, "large.jpg", "1600"),
        (2.0, "large@2x.jpg", "1600"),
        (2.5, "large@2x.jpg", "1280"),
    ] {
        let mut rwd = setup(1200);
        rwd.host_mut().set_device_pixel_ratio(Some(ratio));
        let hero = node(&rwd, "hero");
        rwd.picture(&[hero], PictureOptions::new()).unwrap();
        rwd.pump().unwrap();

        assert_eq!(src(&rwd, "hero"), expected);
        let doc = rwd.host().document();
        let img = doc.tree().get_elements_by_tag_name(hero, "img")[0];
        assert_eq!(doc.get_attribute(img, "width"), Some(width));
    }
}

#[test]
fn test_bare_url_counts_as_1x() {
    let mut rwd = setup(400);
    rwd.host_mut().set_device_pixel_ratio(Some(1.5));
    let logo = node(&rwd, "logo");
    rwd.picture(&[logo], PictureOptions::new()).unwrap();
    assert_eq!(src(&rwd, "logo"), "logo.png");
}

#[test]
fn test_no_candidate_is_reported() {
    let mut rwd = setup(1200);
    rwd.host_mut().set_device_pixel_ratio(Some(0.5));
    let hero = node(&rwd, "hero");

    let err = rwd.picture(&[hero], PictureOptions::new()).unwrap_err();
    assert!(matches!(err, RwdError::NoCandidate { .. }));

    // Refresh on resize only logs it
    rwd.host_mut().resize(1300, 800);
    assert!(rwd.pump().is_ok());
    assert_eq!(src(&rwd, "hero"), "");
}

#[test]
fn test_stale_load_is_ignored() {
    let mut rwd = setup(400);
    let log: Log = Rc::default();

    rwd.host_mut().resize(1200, 800);
    let hero = node(&rwd, "hero");
    rwd.picture(&[hero], recorder(&log)).unwrap();
    rwd.host_mut().resize(400, 800);
    rwd.pump().unwrap();

    let loads: Vec<_> = log.borrow().iter().filter(|e| e.starts_with("load")).cloned().collect();
    assert_eq!(loads, vec!["loadonce:small.jpg", "load:small.jpg"]);
    assert_eq!(rwd.host().fetches(), ["large.jpg", "small.jpg"]);
}

#[test]
fn test_callback_error_stops_pump() {
    let mut rwd = setup(700);
    let hero = node(&rwd, "hero");
    let options = PictureOptions::new().on(PictureEvent::Load, |_| anyhow::bail!("broken"));
    rwd.picture(&[hero], options).unwrap();

    let err = rwd.pump().unwrap_err();
    assert!(matches!(err, RwdError::Callback { hook: "load", .. }));
}

#[test]
fn test_native_picture_is_left_alone() {
    init_tracing();
    let mut host = window(700);
    host.set_native_picture(true);
    let mut rwd = Rwd::new(host);
    rwd.init();
    let nodes = rwd.host().document().tree().len();
    let hero = node(&rwd, "hero");

    assert!(rwd.native_picture());
    assert_eq!(rwd.picture(&[hero], PictureOptions::new()).unwrap(), 0);
    assert!(rwd.pictures().is_empty());
    assert_eq!(rwd.host().document().tree().len(), nodes);
    assert!(rwd.host().fetches().is_empty());
}

#[test]
fn test_viewport_probe_never_stays() {
    let mut rwd = setup(700);

    assert_eq!(rwd.viewport_width().unwrap(), 700);
    assert_eq!(rwd.viewport_height().unwrap(), 800);

    let probe_id = rwd.config().probe_id.clone();
    assert_eq!(rwd.host().document().get_element_by_id(&probe_id), None);
}

#[test]
fn test_selection_adapter() {
    let mut rwd = setup(700);
    let selection = Selection::select(rwd.host().document(), ".responsive");
    assert_eq!(selection.len(), 3);

    let selection = selection.picture(&mut rwd, &PictureOptions::new()).unwrap();
    assert_eq!(selection.len(), 3);
    assert_eq!(rwd.pictures().len(), 2);
    assert_eq!(src(&rwd, "hero"), "medium.jpg");
    assert_eq!(src(&rwd, "logo"), "logo.png");
}

#[test]
fn test_reinit_binds_again() {
    let mut rwd = setup(700);
    rwd.init();

    assert_eq!(rwd.breakpoints().len(), 6);
    assert_eq!(rwd.host().resize_listener_count(), 2);

    rwd.host_mut().resize(400, 800);
    assert_eq!(rwd.pump().unwrap(), 2);
    assert_eq!(rwd.breakpoint(), Some("small"));
}
