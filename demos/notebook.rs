//! Notebook demo - multiline text and list regions
//!
//! Two live regions side by side: a note whose embedded newlines render as
//! `<br>` separators, and an entry list that is fully replaced on every
//! write. Also shows that a detached subtree drops updates silently.
//!
//! Run with: cargo run --example notebook

use weft_dom::{build, fragment, signal, Child, Node, Props};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== weft-dom Notebook Demo ===\n");

    let note = signal(String::from("first line"));
    let entries = signal(vec![String::from("alpha"), String::from("beta")]);

    let list = build(
        "ul",
        Props::new().children(entries.computed(|items: &Vec<String>| -> Child {
            items
                .iter()
                .map(|item| Child::from(build("li", Props::new().children(item.as_str()))))
                .collect::<Vec<_>>()
                .into()
        })),
    );

    let page = build(
        "section",
        Props::new().set("id", "notebook").children(fragment(vec![
            Child::from(build("p", Props::new().children(note.to_child()))),
            Child::from(list.clone()),
        ])),
    );

    let document = Node::document();
    if let Err(err) = document.append(&page) {
        eprintln!("mount failed: {err}");
        return;
    }

    println!("Initial:\n{}\n", page.outer_html());

    // A newline in the note becomes a <br> between text nodes.
    note.set(String::from("first line\nsecond line"));
    println!("After multiline note:\n{}\n", page.outer_html());

    // The whole list region is replaced, not diffed.
    entries.set(vec![String::from("gamma")]);
    println!("After list replacement:\n{}\n", page.outer_html());

    // Detached subtrees drop updates; the stale rendering stays put.
    list.detach();
    entries.set(vec![String::from("never rendered")]);
    println!("After detached write:\n{}", page.outer_html());
}
