// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_marker_content(size: usize) -> String {
    let base = "Drag {{numberScrubber:numberScrubber-1}} to set the mass, then pick {{dropdown:dropdown-2}} and explain in {{textInput:textInput-3}}. Stray {{braces}} stay literal. ";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_keystrokes(words: usize) -> Vec<String> {
    let mut keys = Vec::new();
    for word in 0..words {
        for ch in format!("word{word} ").chars() {
            keys.push(ch.to_string());
        }
        if word % 10 == 0 {
            keys.extend(["/", "n", "u", "m", " "].map(String::from));
        }
    }
    keys
}
