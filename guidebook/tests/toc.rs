use guidebook::block::ContentBlock;
use guidebook::toc::{TocItem, build_toc};

fn heading(level: u8, text: &str) -> ContentBlock {
    ContentBlock::heading(level, text)
}

fn ids(items: &[TocItem]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.walk())
        .map(|item| format!("{}:{}", item.level, item.id))
        .collect()
}

#[test]
fn nests_by_level() {
    let blocks = vec![
        heading(1, "Guide"),
        heading(2, "Ajout"),
        heading(3, "Document existant"),
        ContentBlock::paragraph("text"),
        heading(3, "Office Editor"),
        heading(2, "Recherche"),
        heading(4, "Avancée"),
    ];
    let toc = build_toc(&blocks);

    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].children.len(), 2);
    assert_eq!(toc[0].children[0].children.len(), 2);
    assert_eq!(
        ids(&toc),
        vec![
            "1:guide",
            "2:ajout",
            "3:document-existant",
            "3:office-editor",
            "2:recherche",
            "4:avancee",
        ]
    );
}

#[test]
fn shallower_heading_closes_deeper_ones() {
    let blocks = vec![heading(3, "Orphan"), heading(2, "Section"), heading(1, "Top")];
    let toc = build_toc(&blocks);
    let roots: Vec<&str> = toc.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(roots, vec!["Orphan", "Section", "Top"]);
}

#[test]
fn explicit_id_wins_and_blank_headings_skipped() {
    let blocks = vec![
        ContentBlock::Heading {
            level: 2,
            text: "Connexion".into(),
            id: Some("login".into()),
        },
        heading(2, "   "),
        heading(2, " 3 étapes "),
    ];
    let toc = build_toc(&blocks);
    assert_eq!(ids(&toc), vec!["2:login", "2:sec-3-etapes"]);
    assert_eq!(toc[1].text, "3 étapes");
}

#[test]
fn empty_input_has_empty_toc() {
    assert!(build_toc(&[]).is_empty());
    assert!(build_toc(&[ContentBlock::paragraph("no headings")]).is_empty());
}
