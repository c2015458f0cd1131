//! Renders grouped entries into Markdown index pages. Pages are assembled as
//! plain strings; there is no template engine.

use crate::index::Group;
use crate::language::Language;
use crate::tag::Tag;
use std::collections::BTreeSet;

/// Renders index pages. Holds the settings shared by every page of a site.
pub struct Renderer<'a> {
    /// The `title` written into each page's front matter.
    pub title: &'a str,

    /// The `comments` flag written into each page's front matter.
    pub comments: bool,

    /// The `layout` written into each page's front matter.
    pub layout: &'a str,

    /// The language for month names and labels.
    pub language: Language,

    /// The link target for the "all" entry of the tag navigation line.
    pub home_url: &'a str,

    /// The base URL of tag pages. See [`Tag::url`].
    pub tags_url: &'a str,
}

impl Renderer<'_> {
    /// Renders one index page. `active_tag` is the tag the page is filtered
    /// by, or `None` for the main index; `all_tags` is every tag on the site.
    pub fn render(
        &self,
        groups: &[Group],
        active_tag: Option<&Tag>,
        all_tags: &BTreeSet<Tag>,
    ) -> String {
        let mut out = String::from("---\n");
        out.push_str(&format!("title: \"{}\"\n", escape_quoted(self.title)));
        out.push_str(&format!("comments: {}\n", self.comments));
        out.push_str(&format!("layout: {}\n", self.layout));
        out.push_str("---\n\n");

        if !all_tags.is_empty() {
            out.push_str(&self.tag_line(active_tag, all_tags));
        }

        if groups.is_empty() {
            out.push_str(self.language.no_posts());
            out.push_str("\n\n");
        }

        for group in groups {
            out.push_str(&format!(
                "## {} - {}\n\n",
                group.year,
                self.language.month_name(group.month)
            ));
            for entry in &group.entries {
                out.push_str(&format!(
                    "- [{}]({})\n",
                    escape_markdown(&entry.title),
                    entry.url
                ));
            }
            out.push('\n');
        }
        out
    }

    /// Builds the navigation line: the "all" link followed by every tag in
    /// slug order. The entry for the current page is rendered unlinked.
    fn tag_line(&self, active_tag: Option<&Tag>, all_tags: &BTreeSet<Tag>) -> String {
        let mut links: Vec<String> = Vec::with_capacity(all_tags.len() + 1);
        let all = self.language.all_label();
        links.push(match active_tag {
            None => format!("`{}`", all),
            Some(_) => format!("[`{}`]({})", all, self.home_url),
        });
        for tag in all_tags {
            links.push(if Some(tag) == active_tag {
                format!("`{}`", tag.name)
            } else {
                format!("[`{}`]({})", tag.name, tag.url(self.tags_url))
            });
        }
        format!("**{}** {}\n\n", self.language.tags_label(), links.join(" "))
    }
}

/// Escapes `[` and `]` so titles can't break out of link text.
pub fn escape_markdown(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn escape_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
