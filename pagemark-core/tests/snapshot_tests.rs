//! Snapshot tests for classifier and layout output using insta

use pagemark_core::{build_layout, classify_with_tier, PageMetrics};

#[test]
fn test_markdown_classification_snapshot() {
    let classification = classify_with_tier("# Intro\ntext\n## Part 1\nmore");

    insta::assert_json_snapshot!(classification, @r###"
    {
      "tier": "structured_headings",
      "chapters": [
        {
          "title": "Intro",
          "level": 1,
          "source_offset": 0,
          "page_index": 0
        },
        {
          "title": "Part 1",
          "level": 2,
          "source_offset": 13,
          "page_index": 0
        }
      ]
    }
    "###);
}

#[test]
fn test_unclassified_snapshot() {
    let classification = classify_with_tier("plain words only");

    insta::assert_json_snapshot!(classification, @r###"
    {
      "tier": null,
      "chapters": []
    }
    "###);
}

#[test]
fn test_layout_snapshot() {
    // Two lines per page; "# B" overflows and stays on the second page
    let layout = build_layout("# A\nfoo\nbar\n# B\nbaz", PageMetrics::new(16, 60.0));

    insta::assert_json_snapshot!(layout, @r###"
    {
      "pages": [
        {
          "index": 0,
          "text": "# A\nfoo",
          "start_offset": 0,
          "end_offset": 8
        },
        {
          "index": 1,
          "text": "bar\n# B",
          "start_offset": 8,
          "end_offset": 16
        },
        {
          "index": 2,
          "text": "baz",
          "start_offset": 16,
          "end_offset": 19
        }
      ],
      "chapters": [
        {
          "title": "A",
          "level": 1,
          "source_offset": 0,
          "page_index": 0
        },
        {
          "title": "B",
          "level": 1,
          "source_offset": 12,
          "page_index": 1
        }
      ]
    }
    "###);
}
