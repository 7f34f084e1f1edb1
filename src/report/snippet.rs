//! Fixed storage-format snippets appended to page bodies.

/// Appends the force-update callout to a page body: an info macro telling
/// readers how to trigger a refresh of the generated figures via the build
/// job at `target_url`.
#[must_use]
pub fn append_force_update_callout(body: &str, target_url: &str) -> String {
    format!(
        "{body}\n <ac:structured-macro ac:macro-id=\"c2a0a348-59c3-4f95-902e-3fa525e68f15\" \
         ac:name=\"info\" ac:schema-version=\"1\">\n \
         <ac:parameter ac:name=\"title\">Force update</ac:parameter>\n \
         <ac:rich-text-body>\n \
         <p>If you have changed the mapping of hip items you can force an update of the figure \
         by pressing <strong>run</strong> in this <a href=\"{target_url}\">link</a>. \
         Do note that it will take minutes before the pages gets updated.</p>\n \
         </ac:rich-text-body> \n </ac:structured-macro>"
    )
}
