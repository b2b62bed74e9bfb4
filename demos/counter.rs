//! Counter demo - signals, events, and live DOM regions
//!
//! Builds a small counter widget: a button whose click handler writes a
//! signal, and a label whose content is a derived cell following it. Every
//! click re-renders only the label's marker-delimited region.
//!
//! Run with: cargo run --example counter

use weft_dom::{build, signal, Child, Node, Props, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== weft-dom Counter Demo ===\n");

    let count = signal(0i64);
    let label = count.computed(|n| Value::from(format!("Count: {n}")));

    let count_for_click = count.clone();
    let button = build(
        "button",
        Props::new()
            .set("id", "increment")
            .on("click", move |_| {
                count_for_click.update(|n| n + 1);
            })
            .children("+1"),
    );

    let widget = build(
        "div",
        Props::new()
            .set("className", "counter")
            .children(vec![
                Child::from(build("span", Props::new().children(label.to_child()))),
                Child::from(button.clone()),
            ]),
    );

    let document = Node::document();
    if let Err(err) = document.append(&widget) {
        eprintln!("mount failed: {err}");
        return;
    }

    println!("Initial:\n{}\n", widget.outer_html());

    // Synthetic clicks; each one updates the label region synchronously.
    println!("--- Dispatching 3 clicks ---\n");
    for _ in 0..3 {
        button.dispatch("click");
    }

    println!("After clicks:\n{}\n", widget.outer_html());
    println!("Signal value: {}", count.get());
}
