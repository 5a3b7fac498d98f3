// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_card_content(cards: usize) -> String {
    let card = "# Card Title\n\nParagraph with some **bold** and *italic* content.\n\n- Bullet point\n- Another item\n\n> A quote\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n";
    vec![card; cards].join("\n---\n\n")
}

#[allow(dead_code)]
pub fn generate_hostile_content(cards: usize) -> String {
    let card = "# Card\n\n<script>alert(1)</script>\n\n<img src=x onerror=alert(1)>\n\n[link](javascript:void(0))\n";
    vec![card; cards].join("\n---\n")
}
