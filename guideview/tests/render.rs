use guidebook::section::{SectionBody, SectionSummary};
use guidebook::toc::build_toc;
use guidebook::{CalloutTone, ContentBlock};
use guideview::render::{render_index, render_section, render_state, render_toc};
use guideview::{ViewError, ViewState};

fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
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
fn index_cards() {
    let sections = vec![
        summary("Intro", "intro", Some("hello"), "Section A"),
        summary("Next", "next", None, "Section B"),
    ];
    let text = render(|out| render_index(out, &sections));
    assert_eq!(
        text,
        "SECTION A\nIntro\n  /overview/intro\n  hello\n\n\
         SECTION B\nNext\n  /overview/next\n  Open the section →\n"
    );
}

#[test]
fn empty_index() {
    let text = render(|out| render_index(out, &[]));
    assert_eq!(text, "No sections in this guide.\n");
}

#[test]
fn section_page() {
    let section = SectionBody {
        title: "Intro".into(),
        body: vec![
            ContentBlock::paragraph("hello"),
            ContentBlock::Callout {
                text: "Be careful.".into(),
                title: None,
                tone: Some(CalloutTone::Warn),
                icon: None,
            },
        ],
    };
    let text = render(|out| render_section(out, &section));
    assert!(text.starts_with("Intro\nOverview / Intro\n\nhello\n"));
    assert!(text.contains("> [!WARNING]"));
    assert!(text.contains("> Be careful."));
}

#[test]
fn empty_section_page() {
    let section = SectionBody {
        title: "Section 1".into(),
        body: Vec::new(),
    };
    let text = render(|out| render_section(out, &section));
    assert_eq!(
        text,
        "Section 1\nOverview / Section 1\n\nNo content for this section.\n"
    );
}

#[test]
fn non_ready_states() {
    let loading: ViewState<()> = ViewState::Loading;
    assert_eq!(
        render(|out| render_state(out, &loading, |_, _| Ok(()))),
        "Loading…\n"
    );

    let not_found: ViewState<()> = ViewState::NotFound {
        slug: "missing-slug".into(),
    };
    let text = render(|out| render_state(out, &not_found, |_, _| Ok(())));
    assert!(text.starts_with("Section not found: missing-slug\n"));
    assert!(text.ends_with("/overview\n"));

    let failed: ViewState<()> = ViewState::Failed(ViewError::fetch("/a.json", "refused"));
    assert_eq!(
        render(|out| render_state(out, &failed, |_, _| Ok(()))),
        "The content could not be loaded. Navigate again to retry.\n"
    );
}

#[test]
fn ready_state_delegates() {
    let ready = ViewState::Ready(vec![summary("Intro", "intro", None, "Section A")]);
    let text = render(|out| render_state(out, &ready, |out, sections| render_index(out, sections)));
    assert!(text.starts_with("SECTION A\nIntro\n"));
}

#[test]
fn nested_toc() {
    let blocks = vec![
        ContentBlock::heading(1, "Guide"),
        ContentBlock::heading(2, "Intro"),
        ContentBlock::heading(3, "Details"),
        ContentBlock::heading(2, "Next"),
    ];
    let text = render(|out| render_toc(out, &build_toc(&blocks)));
    assert_eq!(
        text,
        "- Guide (#guide)\n  - Intro (#intro)\n    - Details (#details)\n  - Next (#next)\n"
    );
}
