use guidebook::block::ContentBlock;
use guidebook::section::{
    Resolution, SectionBody, SectionSummary, list_sections, ordinal_label, ordinal_letters,
    partition, resolve_in, resolve_section,
};

fn h1(text: &str) -> ContentBlock {
    ContentBlock::heading(1, text)
}

fn h2(text: &str) -> ContentBlock {
    ContentBlock::heading(2, text)
}

fn p(text: &str) -> ContentBlock {
    ContentBlock::paragraph(text)
}

fn sample() -> Vec<ContentBlock> {
    vec![h2("Intro"), p("hello"), h2("Next"), p("world"), p("ignored")]
}

fn summary(title: &str, slug: &str, description: Option<&str>, label: &str) -> SectionSummary {
    SectionSummary {
        title: title.into(),
        slug: slug.into(),
        description: description.map(str::to_string),
        ordinal_label: label.into(),
    }
}

#[test]
fn empty_sequence_has_no_sections() {
    assert_eq!(list_sections(&[]), vec![]);
}

#[test]
fn no_level_two_headings_means_no_sections() {
    let blocks = vec![h1("Guide"), p("intro"), ContentBlock::heading(3, "Detail")];
    assert!(list_sections(&blocks).is_empty());
}

#[test]
fn lists_sections_in_document_order() {
    assert_eq!(
        list_sections(&sample()),
        vec![
            summary("Intro", "intro", Some("hello"), "Section A"),
            summary("Next", "next", Some("world"), "Section B"),
        ]
    );
}

#[test]
fn description_is_first_paragraph_within_bounds() {
    let blocks = vec![
        h1("Guide"),
        p("before any section"),
        h2("Images first"),
        ContentBlock::Image {
            src: "/image.png".into(),
            alt: "Form".into(),
            caption: None,
        },
        ContentBlock::Callout {
            text: "not a paragraph".into(),
            title: None,
            tone: None,
            icon: None,
        },
        p("first paragraph"),
        h2("Empty"),
        h2("Last"),
    ];
    let sections = list_sections(&blocks);
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].description.as_deref(), Some("first paragraph"));
    assert_eq!(sections[1].description, None);
    assert_eq!(sections[2].description, None);
}

#[test]
fn titles_are_trimmed() {
    let blocks = vec![h2("  Recherche par numéro tiers \n")];
    let sections = list_sections(&blocks);
    assert_eq!(sections[0].title, "Recherche par numéro tiers");
    assert_eq!(sections[0].slug, "recherche-par-numero-tiers");
}

#[test]
fn blank_heading_gets_fallback_title() {
    let blocks = vec![h2("   "), p("body"), h2("Named"), h2("")];
    let sections = list_sections(&blocks);
    assert_eq!(sections[0].title, "Section 1");
    assert_eq!(sections[0].slug, "section-1");
    assert_eq!(sections[1].title, "Named");
    assert_eq!(sections[2].title, "Section 3");

    match resolve_section(&blocks, "section-1") {
        Resolution::Found(body) => {
            assert_eq!(body.title, "Section 1");
            assert_eq!(body.body, vec![p("body")]);
        }
        Resolution::NotFound => panic!("fallback slug should resolve"),
    }
}

#[test]
fn resolves_section_body_without_heading() {
    assert_eq!(
        resolve_section(&sample(), "next"),
        Resolution::Found(SectionBody {
            title: "Next".into(),
            body: vec![p("world"), p("ignored")],
        })
    );
}

#[test]
fn missing_slug_is_not_found() {
    assert_eq!(resolve_section(&sample(), "missing-slug"), Resolution::NotFound);
}

#[test]
fn empty_or_absent_input_is_not_found() {
    assert_eq!(resolve_section(&[], "intro"), Resolution::NotFound);
    assert_eq!(resolve_in(None, "intro"), Resolution::NotFound);
    assert!(resolve_in(Some(&sample()), "intro").is_found());
}

#[test]
fn empty_slug_never_matches() {
    let blocks = vec![h2("Intro"), p("hello")];
    assert_eq!(resolve_section(&blocks, ""), Resolution::NotFound);
}

#[test]
fn punctuation_only_heading_gets_positional_slug() {
    let blocks = vec![h2("Intro"), p("hello"), h2("???"), p("reachable")];
    let sections = list_sections(&blocks);
    assert_eq!(sections[1].title, "???");
    assert_eq!(sections[1].slug, "section-2");
    assert!(sections.iter().all(|section| !section.slug.is_empty()));

    assert_eq!(
        resolve_section(&blocks, "section-2"),
        Resolution::Found(SectionBody {
            title: "???".into(),
            body: vec![p("reachable")],
        })
    );
    assert_eq!(resolve_section(&blocks, ""), Resolution::NotFound);
}

#[test]
fn duplicate_slugs_resolve_to_first() {
    let blocks = vec![
        h2("Numéro tiers"),
        p("first"),
        h2("Numero tiers!"),
        p("second"),
    ];
    let found = resolve_section(&blocks, "numero-tiers").into_option();
    assert_eq!(found.map(|s| s.body), Some(vec![p("first")]));

    let slugs: Vec<String> = list_sections(&blocks).into_iter().map(|s| s.slug).collect();
    assert_eq!(slugs, vec!["numero-tiers", "numero-tiers"]);
}

#[test]
fn deeper_headings_stay_inside_section() {
    let blocks = vec![
        h2("Outer"),
        ContentBlock::heading(3, "Inner"),
        p("inner text"),
        h1("Top level"),
        p("still outer"),
    ];
    let body = resolve_section(&blocks, "outer").into_option().map(|s| s.body);
    assert_eq!(body.map(|b| b.len()), Some(4));
}

#[test]
fn opaque_blocks_pass_through() {
    let mut fields = serde_json::Map::new();
    fields.insert("url".into(), serde_json::json!("https://example.test/v.mp4"));
    let video = ContentBlock::Extension {
        kind: "video".into(),
        fields,
    };
    let blocks = vec![h2("Media"), video.clone(), p("after")];

    let sections = list_sections(&blocks);
    assert_eq!(sections[0].description.as_deref(), Some("after"));
    let body = resolve_section(&blocks, "media").into_option().map(|s| s.body);
    assert_eq!(body, Some(vec![video, p("after")]));
}

#[test]
fn partitions_are_half_open_ranges() {
    let blocks = vec![p("preamble"), h2("A"), p("a"), h2("B")];
    let parts = partition(&blocks);
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].heading, 1);
    assert_eq!(parts[0].body_range(), 2..3);
    assert_eq!(parts[1].heading, 3);
    assert_eq!(parts[1].body_range(), 4..4);
    assert!(parts[1].body(&blocks).is_empty());
}

#[test]
fn ordinal_letters_extend_past_z() {
    assert_eq!(ordinal_letters(0), "A");
    assert_eq!(ordinal_letters(25), "Z");
    assert_eq!(ordinal_letters(26), "AA");
    assert_eq!(ordinal_letters(27), "AB");
    assert_eq!(ordinal_letters(51), "AZ");
    assert_eq!(ordinal_letters(52), "BA");
    assert_eq!(ordinal_letters(701), "ZZ");
    assert_eq!(ordinal_letters(702), "AAA");
    assert_eq!(ordinal_label(2), "Section C");
}

#[test]
fn many_sections_get_distinct_labels() {
    let blocks: Vec<ContentBlock> = (0..30).map(|i| h2(&format!("Part {}", i))).collect();
    let labels: Vec<String> = list_sections(&blocks)
        .into_iter()
        .map(|s| s.ordinal_label)
        .collect();
    assert_eq!(labels[25], "Section Z");
    assert_eq!(labels[26], "Section AA");
    assert_eq!(labels[29], "Section AD");
}

#[test]
fn summary_serializes_camel_case() {
    let json = serde_json::to_value(&list_sections(&sample())[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "title": "Intro",
            "slug": "intro",
            "description": "hello",
            "ordinalLabel": "Section A"
        })
    );
}
