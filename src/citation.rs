//! Citation strings for literature entries.

use crate::literature::Literature;

/// Author text used in citations: `A`, `A and B`, or `A et al.`.
pub fn cite_authors(item: &Literature) -> String {
    match item.author_list().as_slice() {
        [] => String::new(),
        [one] => one.to_string(),
        [a, b] => format!("{} and {}", a, b),
        [first, ..] => format!("{} et al.", first),
    }
}

/// Author text on list rows and cards: first author, plus `et al.` when
/// there are more.
pub fn short_authors(item: &Literature) -> String {
    let authors = item.author_list();
    match authors.first() {
        None => String::new(),
        Some(first) if authors.len() > 1 => format!("{} et al.", first),
        Some(first) => first.to_string(),
    }
}

fn build(item: &Literature, journal: &str) -> String {
    let mut out = format!("{} ({}). {}. {}", cite_authors(item), item.year, item.title, journal);
    if let Some(volume) = &item.volume {
        out.push_str(", ");
        out.push_str(volume);
    }
    if let Some(pages) = &item.pages {
        out.push_str(", ");
        out.push_str(pages);
    }
    out.push('.');
    if let Some(doi) = &item.doi {
        out.push_str(" https://doi.org/");
        out.push_str(doi);
    }
    out
}

/// Plain-text citation.
pub fn citation(item: &Literature) -> String {
    build(item, &item.journal)
}

/// Citation with the journal wrapped in `<em>`.
pub fn citation_markup(item: &Literature) -> String {
    build(item, &format!("<em>{}</em>", item.journal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literature::sample_literature;

    #[test]
    fn test_many_authors_use_et_al() {
        let item = &sample_literature()[0];
        assert_eq!(
            citation(item),
            "Zhang, L. et al. (2024). Advanced Electrochemical Energy Storage Technologies: A Comprehensive Review. \
             Nature Energy, 9, 123-145. https://doi.org/10.1038/s41560-024-01455-2"
        );
    }

    #[test]
    fn test_two_authors_and_missing_optionals() {
        let mut item = sample_literature().remove(1);
        item.authors = "Miller, J.; Thompson, R.".into();
        item.volume = None;
        item.pages = None;
        item.doi = None;
        assert_eq!(
            citation_markup(&item),
            "Miller, J. and Thompson, R. (2023). Solid-State Batteries: Materials Engineering and Interface Design. \
             <em>Science Advances</em>."
        );
        assert_eq!(short_authors(&item), "Miller, J. et al.");
    }

    #[test]
    fn test_single_author() {
        let mut item = sample_literature().remove(0);
        item.authors = " Zhang, L. ".into();
        assert_eq!(cite_authors(&item), "Zhang, L.");
        assert_eq!(short_authors(&item), "Zhang, L.");
    }
}
