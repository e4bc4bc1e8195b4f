// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_html_content(sections: usize) -> String {
    let mut content = String::from("<html><body>");

    for section in 0..sections {
        let level = section % 4 + 1;
        content.push_str(&format!("<h{level}>Region {section}</h{level}>"));
        content.push_str(
            "<p>Visit the <strong>central market</strong> before noon, then follow the \
             <a href=\"https://example.com/coast\">coastal road</a> west.</p>",
        );

        let list = if section % 2 == 0 { "ul" } else { "ol" };
        content.push_str(&format!("<{list}>"));
        for item in 0..5 {
            content.push_str(&format!("<li>Stop {item} with <strong>local food</strong></li>"));
        }
        content.push_str(&format!("</{list}>"));
    }

    content.push_str("</body></html>");
    content
}

#[allow(dead_code)]
pub fn generate_markdown_content(sections: usize) -> String {
    let base = "## Region\n\nVisit the **central market** before noon, then follow the [coastal road](https://example.com/coast) west.\n\n- Stop one\n- Stop **two**\n\n1. Book\n2. Fly\n\n";
    base.repeat(sections)
}
