//! Server-rendered pages.
//!
//! Every page is the embedded layout shell with a title, the pending flash
//! notices and a body fragment. All user-provided text goes through
//! [`escape_html`].

use axum::http::StatusCode;
use axum::response::Html;
use bookshelf_core::{Book, SearchMode};

use crate::flash::Flash;
use crate::forms::{BookForm, FormErrors, SearchForm, UpdateForm};

/// Embedded HTML shell shared by every page
pub const LAYOUT_HTML: &str = include_str!("layout.html");

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Substitute `{{key}}` placeholders in a single pass, so substituted text is
/// never scanned again. Unknown keys are left as they are.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = after[..end].trim();
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(&after[..end + 2]);
            },
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn layout(title: &str, flashes: &[Flash], content: &str) -> Html<String> {
    let notices: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<div class="alert {}" role="alert">{}</div>"#,
                f.level.css_class(),
                escape_html(&f.message)
            )
        })
        .collect();
    let title = escape_html(title);
    Html(fill(
        LAYOUT_HTML,
        &[("title", title.as_str()), ("flashes", notices.as_str()), ("content", content)],
    ))
}

struct Field<'a> {
    name: &'a str,
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    error: Option<&'a str>,
}

impl Field<'_> {
    fn render(&self) -> String {
        let (class, feedback) = match self.error {
            Some(msg) => {
                ("form-control is-invalid", format!(r#"<div class="invalid-feedback">{}</div>"#, escape_html(msg)))
            },
            None => ("form-control", String::new()),
        };
        format!(
            r#"<div class="mb-3"><label class="form-label" for="{name}">{label}</label><input class="{class}" type="text" id="{name}" name="{name}" value="{value}" placeholder="{placeholder}">{feedback}</div>"#,
            name = self.name,
            label = escape_html(self.label),
            value = escape_html(self.value),
            placeholder = escape_html(self.placeholder),
        )
    }
}

fn form(action: &str, fields: &[Field<'_>], submit: &str) -> String {
    let inputs: String = fields.iter().map(Field::render).collect();
    format!(
        r#"<form method="post" action="{}" novalidate>{inputs}<button class="btn btn-primary" type="submit">{}</button></form>"#,
        escape_html(action),
        escape_html(submit)
    )
}

fn book_table(books: &[Book]) -> String {
    if books.is_empty() {
        return r#"<p class="text-muted">No books in the catalog.</p>"#.to_owned();
    }
    let rows: String = books
        .iter()
        .map(|b| {
            format!(
                r#"<tr><td>{title}</td><td>{author}</td><td>{series}</td><td>{rating}</td><td><a class="btn btn-sm btn-outline-primary" href="/book/{id}">Edit</a> <a class="btn btn-sm btn-outline-danger" href="/delete?book_id={id}">Delete</a></td></tr>"#,
                id = b.id,
                title = escape_html(&b.title),
                author = escape_html(&b.author),
                series = escape_html(b.series.as_deref().unwrap_or("")),
                rating = b.rating,
            )
        })
        .collect();
    format!(
        r#"<table class="table table-striped"><thead><tr><th>Title</th><th>Author</th><th>Series</th><th>Rating</th><th></th></tr></thead><tbody>{rows}</tbody></table>"#
    )
}

pub fn home(flashes: &[Flash], book_count: u64) -> Html<String> {
    let body = format!(
        r#"<p>Keep track of the books you have read. {book_count} book(s) in the catalog.</p>
<div class="d-flex gap-2 flex-wrap">
  <a class="btn btn-primary" href="/add">Add a book</a>
  <a class="btn btn-secondary" href="/list">All books</a>
  <a class="btn btn-secondary" href="/search">Search</a>
  <a class="btn btn-outline-secondary" href="/export">Export to spreadsheet</a>
  <a class="btn btn-outline-secondary" href="/import">Import from spreadsheet</a>
  <a class="btn btn-outline-danger" href="/delete_db">Delete all</a>
</div>"#
    );
    layout("My Library", flashes, &body)
}

pub fn add_page(flashes: &[Flash], values: &BookForm, errors: &FormErrors) -> Html<String> {
    let fields = [
        Field {
            name: "title",
            label: "Book Name",
            value: &values.title,
            placeholder: "Game of Thrones",
            error: errors.get("title"),
        },
        Field {
            name: "author",
            label: "Author",
            value: &values.author,
            placeholder: "George Martin",
            error: errors.get("author"),
        },
        Field {
            name: "series",
            label: "Series",
            value: &values.series,
            placeholder: "The trial of fire series",
            error: errors.get("series"),
        },
        Field {
            name: "rating",
            label: "Rating",
            value: &values.rating,
            placeholder: "6.8",
            error: errors.get("rating"),
        },
    ];
    layout("Add Book", flashes, &form("/add", &fields, "Add Book"))
}

pub fn update_page(
    flashes: &[Flash],
    book: &Book,
    values: &UpdateForm,
    errors: &FormErrors,
) -> Html<String> {
    let fields = [
        Field {
            name: "title",
            label: "Book Name",
            value: &values.title,
            placeholder: "",
            error: errors.get("title"),
        },
        Field {
            name: "author",
            label: "Author",
            value: &values.author,
            placeholder: "",
            error: errors.get("author"),
        },
        Field {
            name: "rating",
            label: "Rating",
            value: &values.rating,
            placeholder: "6.8",
            error: errors.get("rating"),
        },
    ];
    let series = match &book.series {
        Some(series) => format!(r#"<p class="text-muted">Series: {}</p>"#, escape_html(series)),
        None => String::new(),
    };
    let action = format!("/book/{}", book.id);
    let body = format!("{series}{}", form(&action, &fields, "Update Book Details"));
    layout("Update Book", flashes, &body)
}

pub fn list_page(flashes: &[Flash], books: &[Book]) -> Html<String> {
    layout("All Books", flashes, &book_table(books))
}

pub fn search_page(flashes: &[Flash], values: &SearchForm) -> Html<String> {
    let fields = [
        Field { name: "title", label: "Book Name", value: &values.title, placeholder: "", error: None },
        Field { name: "author", label: "Author", value: &values.author, placeholder: "", error: None },
    ];
    layout("Search", flashes, &form("/search", &fields, "Search for Books"))
}

pub fn search_results_page(
    flashes: &[Flash],
    values: &SearchForm,
    books: &[Book],
    mode: SearchMode,
) -> Html<String> {
    let mut summary = format!(
        r#"<p>Book Name: <strong>{}</strong> · Author: <strong>{}</strong> · {} result(s)</p>"#,
        escape_html(&values.title),
        escape_html(&values.author),
        books.len()
    );
    if mode == SearchMode::Unfiltered {
        summary.push_str(r#"<p class="text-muted">Showing the whole catalog.</p>"#);
    }
    let body = format!(
        r#"{summary}{}<a class="btn btn-link" href="/search">New search</a>"#,
        book_table(books)
    );
    layout("Search Results", flashes, &body)
}

pub fn delete_db_page(flashes: &[Flash]) -> Html<String> {
    layout(
        "Delete Database",
        flashes,
        r#"<p>This removes every book from the catalog. It cannot be undone.</p>
<a class="btn btn-danger" href="/delete_db1">Delete everything</a>
<a class="btn btn-secondary" href="/">Cancel</a>"#,
    )
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<p>{}</p><a class="btn btn-secondary" href="/">Back to the library</a>"#,
        escape_html(message)
    );
    layout(title, &[], &body)
}
