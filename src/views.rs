//! HTML views
//!
//! Server-rendered pages built as plain strings: a shared layout plus one
//! function per page. Everything user-supplied goes through [`escape_html`].

use crate::{error::FieldError, models::book::BookDraft, services::catalog::BookListing};

/// Escape text for interpolation into HTML element or attribute content.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Libris</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<header><h1><a href="/books">Libris</a></h1></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
    )
}

/// The book list page, shared by `/books` and `/search`.
pub fn index(listing: &BookListing) -> String {
    let title = match &listing.query {
        Some(_) => "Search Results",
        None => "All Books",
    };

    let mut body = String::new();
    body.push_str(&format!("<h2>{}</h2>\n", title));
    body.push_str(&format!(
        r#"<form method="get" action="/search" class="search">
<input type="search" name="s" value="{}" placeholder="Search books">
<button type="submit">Search</button>
</form>
"#,
        escape_html(listing.query.as_deref().unwrap_or("")),
    ));
    body.push_str("<p><a href=\"/books/new\">Create New Book</a></p>\n");

    if listing.rows.is_empty() {
        body.push_str("<p class=\"empty\">No books found.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Title</th><th>Author</th><th>Genre</th><th>Year</th></tr></thead>\n<tbody>\n",
        );
        for book in &listing.rows {
            body.push_str(&format!(
                "<tr><td><a href=\"/books/{id}\">{title}</a></td><td>{author}</td><td>{genre}</td><td>{year}</td></tr>\n",
                id = book.id,
                title = escape_html(&book.title),
                author = escape_html(&book.author),
                genre = escape_html(book.genre.as_deref().unwrap_or("")),
                year = book.year.map(|y| y.to_string()).unwrap_or_default(),
            ));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    if listing.pages.total > 1 {
        body.push_str("<nav class=\"pagination\">\n");
        if let Some(previous) = &listing.pages.previous {
            body.push_str(&format!(
                "<a href=\"{}\" rel=\"prev\">Previous</a>\n",
                escape_html(previous)
            ));
        }
        body.push_str(&format!(
            "<span>Page {} of {}</span>\n",
            listing.pages.current, listing.pages.total
        ));
        if let Some(next) = &listing.pages.next {
            body.push_str(&format!(
                "<a href=\"{}\" rel=\"next\">Next</a>\n",
                escape_html(next)
            ));
        }
        body.push_str("</nav>\n");
    }

    layout(title, &body)
}

/// The creation form, empty or re-rendered with the rejected submission.
pub fn new_book(draft: &BookDraft, errors: &[FieldError]) -> String {
    let body = book_form("Create New Book", "/books/new", draft, errors, None);
    layout("Create New Book", &body)
}

/// The detail/edit form, with a delete button; re-rendered with messages on
/// a rejected update.
pub fn update_book(id: i32, draft: &BookDraft, errors: &[FieldError]) -> String {
    let delete = format!(
        r#"<form method="post" action="/books/{id}/delete" class="delete">
<button type="submit">Delete Book</button>
</form>
"#,
    );
    let body = book_form(
        "Book Details",
        &format!("/books/{id}"),
        draft,
        errors,
        Some(&delete),
    );
    layout("Book Details", &body)
}

fn book_form(
    heading: &str,
    action: &str,
    draft: &BookDraft,
    errors: &[FieldError],
    extra: Option<&str>,
) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h2>{}</h2>\n", escape_html(heading)));

    if !errors.is_empty() {
        body.push_str("<div class=\"errors\"><h3>Oops, something went wrong:</h3>\n<ul>\n");
        for error in errors {
            body.push_str(&format!(
                "<li data-field=\"{}\">{}</li>\n",
                escape_html(error.field),
                escape_html(&error.message)
            ));
        }
        body.push_str("</ul>\n</div>\n");
    }

    body.push_str(&format!(
        r#"<form method="post" action="{action}">
<label>Title <input type="text" name="title" value="{title}"></label>
<label>Author <input type="text" name="author" value="{author}"></label>
<label>Genre <input type="text" name="genre" value="{genre}"></label>
<label>Year <input type="text" name="year" value="{year}"></label>
<button type="submit">Save</button>
</form>
<p><a href="/books">Cancel</a></p>
"#,
        action = escape_html(action),
        title = escape_html(&draft.title),
        author = escape_html(&draft.author),
        genre = escape_html(&draft.genre),
        year = escape_html(&draft.year),
    ));

    if let Some(extra) = extra {
        body.push_str(extra);
    }

    body
}

/// The 404 page.
pub fn page_not_found() -> String {
    layout(
        "Page Not Found",
        "<h2>Page Not Found</h2>\n<p>Sorry! We couldn't find the page you were looking for.</p>\n<p><a href=\"/books\">Back to the catalog</a></p>\n",
    )
}

/// The generic failure page. `message` must already be safe to show to the
/// caller; internal detail is logged, never rendered.
pub fn server_error(message: &str) -> String {
    let body = format!(
        "<h2>Server Error</h2>\n<p>{}</p>\n<p><a href=\"/books\">Back to the catalog</a></p>\n",
        escape_html(message)
    );
    layout("Server Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Book;
    use crate::services::catalog::Pages;
    use chrono::Utc;

    fn book(id: i32, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Author".to_string(),
            genre: Some("Genre".to_string()),
            year: Some(2000),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn listing(rows: Vec<Book>, pages: Pages, query: Option<&str>) -> BookListing {
        BookListing {
            rows,
            pages,
            query: query.map(str::to_string),
        }
    }

    fn pages(current: i64, total: i64, previous: Option<&str>, next: Option<&str>) -> Pages {
        Pages {
            current,
            limit: 10,
            total,
            previous: previous.map(str::to_string),
            next: next.map(str::to_string),
        }
    }

    #[test]
    fn escapes_markup_in_user_text() {
        assert_eq!(
            escape_html(r#"<b>"war & peace"</b>"#),
            "&lt;b&gt;&quot;war &amp; peace&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn list_page_escapes_titles_and_links_rows() {
        let page = index(&listing(
            vec![book(7, "Dune <script>")],
            pages(1, 1, None, None),
            None,
        ));
        assert!(page.contains("href=\"/books/7\""));
        assert!(page.contains("Dune &lt;script&gt;"));
        assert!(!page.contains("Dune <script>"));
    }

    #[test]
    fn pagination_nav_shows_only_in_range_links() {
        let page = index(&listing(
            vec![book(1, "A")],
            pages(2, 3, Some("/books?p=1"), Some("/books?p=3")),
            None,
        ));
        assert!(page.contains("rel=\"prev\""));
        assert!(page.contains("rel=\"next\""));
        assert!(page.contains("Page 2 of 3"));

        let single = index(&listing(vec![book(1, "A")], pages(1, 1, None, None), None));
        assert!(!single.contains("pagination"));
    }

    #[test]
    fn empty_listing_renders_a_message_instead_of_a_table() {
        let page = index(&listing(Vec::new(), pages(1, 0, None, None), Some("xyzzy")));
        assert!(page.contains("No books found."));
        assert!(!page.contains("<table>"));
        assert!(page.contains("value=\"xyzzy\""));
    }

    #[test]
    fn form_error_rerender_keeps_values_and_messages() {
        let draft = BookDraft {
            title: String::new(),
            author: "Herbert".to_string(),
            genre: String::new(),
            year: "1965".to_string(),
        };
        let errors = vec![FieldError::new(
            "title",
            "Please provide a value for \"title\".",
        )];
        let page = new_book(&draft, &errors);
        assert!(page.contains("data-field=\"title\""));
        assert!(page.contains("Please provide a value for &quot;title&quot;."));
        assert!(page.contains("value=\"Herbert\""));
        assert!(page.contains("value=\"1965\""));
    }

    #[test]
    fn edit_page_carries_update_and_delete_actions() {
        let draft = BookDraft::from(&book(3, "Dune"));
        let page = update_book(3, &draft, &[]);
        assert!(page.contains("action=\"/books/3\""));
        assert!(page.contains("action=\"/books/3/delete\""));
        assert!(page.contains("value=\"Dune\""));
        assert!(page.contains("value=\"2000\""));
    }
}
