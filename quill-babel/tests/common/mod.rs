//! Helpers shared by the writer tests, plus tests of the traversal machinery.


use quill_babel::{FormatRegistry, Node, Settings};

/// Render `doc` with the named writer.
pub fn render(doc: &Node, format: &str, settings: &Settings) -> String {
    FormatRegistry::with_defaults()
        .serialize_with_settings(doc, format, settings)
        .unwrap_or_else(|e| panic!("{format} rendering failed: {e}"))
        .text
}

/// Text between `\begin{document}` and `\end{document}`.
pub fn latex_body(output: &str) -> &str {
    let start = output
        .find("\\begin{document}\n")
        .map(|i| i + "\\begin{document}\n".len())
        .expect("missing \\begin{document}");
    let end = output.rfind("\n\\end{document}").expect("missing \\end{document}");
    &output[start..end]
}

/// Text before `%%% Body`.
pub fn latex_preamble(output: &str) -> &str {
    let end = output.find("\n%%% Body").expect("missing body marker");
    &output[..end]
}
