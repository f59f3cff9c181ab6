//! Media queries as they appear on breakpoint stylesheet links

use rwd_css::{evaluate, MediaEnvironment, MediaQueryList, MediaType};

const SMALL: &str = "only screen and (max-width: 599px)";
const MEDIUM: &str = "only screen and (min-width: 600px) and (max-width: 1023px)";
const LARGE: &str = "only screen and (min-width: 1024px)";
const RETINA: &str = "(-webkit-min-device-pixel-ratio: 2), (min-resolution: 2dppx)";

fn active(width: f64) -> Vec<&'static str> {
    let env = MediaEnvironment::screen(width, 800.0, 1.0);
    [("small", SMALL), ("medium", MEDIUM), ("large", LARGE)]
        .into_iter()
        .filter(|(_, q)| evaluate(q, &env))
        .map(|(name, _)| name)
        .collect()
}

#[test]
fn test_exactly_one_breakpoint_matches() {
    assert_eq!(active(320.0), vec!["small"]);
    assert_eq!(active(599.0), vec!["small"]);
    assert_eq!(active(600.0), vec!["medium"]);
    assert_eq!(active(1023.0), vec!["medium"]);
    assert_eq!(active(1024.0), vec!["large"]);
}

#[test]
fn test_retina_query_list() {
    let list = MediaQueryList::parse(RETINA).unwrap();
    assert_eq!(list.queries.len(), 2);

    assert!(list.matches(&MediaEnvironment::screen(800.0, 600.0, 2.0)));
    assert!(!list.matches(&MediaEnvironment::screen(800.0, 600.0, 1.5)));
}

#[test]
fn test_print_surface() {
    let env = MediaEnvironment {
        media_type: MediaType::Print,
        ..MediaEnvironment::default()
    };
    assert!(!evaluate(LARGE, &env));
    assert!(evaluate("print and (min-width: 600px)", &env));
}

#[test]
fn test_case_insensitive() {
    let env = MediaEnvironment::screen(700.0, 500.0, 1.0);
    assert!(evaluate("ONLY Screen AND (Min-Width: 600PX)", &env));
}

#[test]
fn test_level_four_breakpoints() {
    let narrow = MediaEnvironment::screen(400.0, 800.0, 1.0);
    for query in [
        "not (min-width: 600px)",
        "(min-width: 600px) or (max-width: 500px)",
        "((max-width: 500px))",
        "(max-width: calc(500px + 1px))",
    ] {
        assert!(evaluate(query, &narrow), "{query} should match a 400px viewport");
    }

    let wide = MediaEnvironment::screen(1200.0, 800.0, 1.0);
    assert!(!evaluate("not (min-width: 600px)", &wide));
    assert!(!evaluate("((max-width: 500px))", &wide));
}
