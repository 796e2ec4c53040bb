use zine_flow::config::PageSetup;
use zine_flow::markers::{build_stream, Interpreter, MarkupRenderer};
use zine_flow::measure::{BoxMeasurer, Font, Measure, Monospace};
use zine_flow::{paginate, Attributes, Block, List, ListItem, ListKind, Node};

/// Just enough markdown: `#` headings, `- ` lists and blank-line paragraphs
struct Markdownish;

impl MarkupRenderer for Markdownish {
    fn render(&mut self, source: &str) -> Vec<Node> {
        source
            .split("\n\n")
            .map(str::trim)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| {
                if let Some(heading) = chunk.strip_prefix("# ") {
                    Node::Block(Block::new("h1", Attributes::new()).with_inner(heading))
                } else if chunk.starts_with("- ") {
                    let items = chunk
                        .lines()
                        .filter_map(|line| line.strip_prefix("- "))
                        .map(ListItem::new)
                        .collect();
                    Node::List(List::new(ListKind::Unordered, items))
                } else {
                    Node::paragraph(chunk)
                }
            })
            .collect()
    }
}

fn source() -> String {
    let items: Vec<String> = (1..=12).map(|i| format!("- {}", lipsum::lipsum(i + 2))).collect();
    format!(
        "[[header: Lorem Ipsum]]\n# Lorem Ipsum\n\n{}\n\n{}\n[[rowbreak 6mm]]\n{}\n\n{}\n[[colbreak]]\n{}\n[[pagebreak]]\n[[footer: the end]]\n{}\n",
        lipsum::lipsum(60),
        lipsum::lipsum(240),
        items.join("\n"),
        lipsum::lipsum(120),
        lipsum::lipsum(30),
        lipsum::lipsum(400),
    )
}

fn run<M: Measure>(measurer: &mut M) {
    let setup = PageSetup::from_json(r#"{ "format": "A6", "columns": 2, "column_gap": "4mm" }"#)
        .expect("setup is valid");
    let geometry = setup.geometry().expect("setup resolves");

    let interpreter = Interpreter::new(geometry.row_break);
    let stream = build_stream(&source(), &mut Markdownish, &interpreter);
    let pages = paginate(stream, &geometry, measurer);

    for (index, page) in pages.iter().enumerate() {
        let usage: Vec<String> = page
            .column_usage(geometry.column_count())
            .iter()
            .map(|u| format!("{:.1}", u.0))
            .collect();
        println!(
            "page {:>2}: {:>2} blocks, columns [{}] of {:.1}pt, header {:?}, footer {:?}{}",
            index + 1,
            page.blocks.len(),
            usage.join(", "),
            geometry.usable_height().0,
            page.header.as_deref().unwrap_or("-"),
            page.footer.as_deref().unwrap_or("-"),
            if page.overflowed { " (overflowed)" } else { "" },
        );
    }
}

fn main() {
    env_logger::init();

    match std::env::args().nth(1) {
        Some(path) => {
            let font = Font::open(&path).expect("can load font");
            println!("measuring with {}", font.name().unwrap_or(path));
            run(&mut BoxMeasurer::new(font, Default::default()));
        }
        None => run(&mut BoxMeasurer::<Monospace>::default()),
    }
}
