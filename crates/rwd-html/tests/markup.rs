//! Parsing the markup the responsive helper works with

use rwd_html::HtmlParser;

const PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
        <head>
            <title>Gallery</title>
            <link rel="stylesheet" href="small.css" data-name="small" media="(max-width: 599px)">
            <link rel="stylesheet" href="large.css" data-name="large" media="(min-width: 600px)">
            <link rel="stylesheet" href="print.css" media="print">
        </head>
        <body>
            <picture id="hero" alt="A lighthouse">
                <source data-media="small" srcset="hero-s.jpg 1x, hero-s@2x.jpg 2x">
                <source data-media="large" src="hero-l.jpg">
            </picture>
        </body>
    </html>
"#;

#[test]
fn test_links_keep_data_attributes() {
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let links = doc.get_elements_by_tag_name("link");
    assert_eq!(links.len(), 3);

    let names: Vec<_> = links
        .iter()
        .filter_map(|&l| doc.get_attribute(l, "data-name"))
        .collect();
    assert_eq!(names, vec!["small", "large"]);
    assert_eq!(doc.get_attribute(links[0], "media"), Some("(max-width: 599px)"));
}

#[test]
fn test_picture_sources_survive_parsing() {
    let doc = HtmlParser::new().parse(PAGE).unwrap();
    let picture = doc.get_element_by_id("hero").unwrap();

    assert_eq!(doc.tree().element(picture).unwrap().tag_name(), "PICTURE");
    assert_eq!(doc.get_attribute(picture, "alt"), Some("A lighthouse"));

    let sources = doc.tree().get_elements_by_tag_name(picture, "source");
    assert_eq!(sources.len(), 2);
    assert_eq!(
        doc.get_attribute(sources[0], "srcset"),
        Some("hero-s.jpg 1x, hero-s@2x.jpg 2x")
    );
    assert_eq!(doc.get_attribute(sources[1], "src"), Some("hero-l.jpg"));
}

#[test]
fn test_parse_malformed_html() {
    let html = r#"
        <div>
            <p>Unclosed paragraph
            <picture><source src="a.jpg">
        </div>
    "#;

    let doc = rwd_html::parse(html).unwrap();
    assert!(doc.body().is_some());
    assert_eq!(doc.get_elements_by_tag_name("source").len(), 1);
}
