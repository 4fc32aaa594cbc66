//! Server-side rendering of the roster page.

use std::fmt::Write as _;

use anyhow::Result;
use products_hr::{EmployeeDraft, HrModule};

const COLUMNS: usize = 6;
const FORM_ID: &str = "employee-form";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f5f6f8; margin: 0; }
.app-container { max-width: 880px; margin: 0 auto; padding: 24px; }
.note { color: #555; }
.card { background: #fff; border-radius: 8px; padding: 16px 20px; margin-bottom: 20px; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.emp-table { width: 100%; border-collapse: collapse; }
.emp-table th, .emp-table td { border-bottom: 1px solid #e4e6ea; padding: 8px; text-align: left; }
.emp-table td.empty { text-align: center; color: #777; }
.form { display: grid; gap: 8px; }
.form input { padding: 8px; border: 1px solid #ccd; border-radius: 4px; }
.btn { padding: 6px 14px; border-radius: 4px; border: 1px solid transparent; cursor: pointer; }
.btn.primary { background: #2563eb; color: #fff; }
.btn.ghost { background: transparent; border-color: #ccd; }
.btn.delete { background: #dc2626; color: #fff; }
.default-submit { position: absolute; left: -9999px; }
pre { background: #0f172a; color: #e2e8f0; padding: 12px; border-radius: 6px; overflow: auto; }
"#;

/// Renders the full page. A pending `notice` becomes a blocking browser alert.
pub fn render_page(hr: &HrModule, notice: Option<&str>) -> Result<String> {
    let mut out = String::with_capacity(4096);
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Employee List</title>\n");
    write!(out, "<style>{STYLE}</style>\n</head>\n<body>\n")?;
    out.push_str("<div class=\"app-container\">\n<header>\n<h1>Employee List</h1>\n");
    // Enter in any input submits the form's first button; that must be Add, not a row's Delete.
    writeln!(
        out,
        "<button type=\"submit\" form=\"{FORM_ID}\" class=\"default-submit\" \
         tabindex=\"-1\" aria-hidden=\"true\">Add</button>"
    )?;
    out.push_str(
        "<p class=\"note\">Each employee: <code>name</code>, <code>age</code>, \
         <code>salary</code>, <code>designation</code></p>\n</header>\n",
    );
    render_table(&mut out, hr)?;
    render_form(&mut out, hr.draft())?;
    render_raw_state(&mut out, hr)?;
    out.push_str("</div>\n");
    if let Some(message) = notice {
        render_alert(&mut out, message)?;
    }
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

fn render_table(out: &mut String, hr: &HrModule) -> Result<()> {
    out.push_str("<section class=\"card\">\n<h2>Current Employees</h2>\n");
    out.push_str("<table class=\"emp-table\">\n<thead>\n<tr>");
    for heading in ["#", "Name", "Age", "Salary (₹)", "Designation", "Action"] {
        write!(out, "<th>{heading}</th>")?;
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    if hr.roster().is_empty() {
        writeln!(
            out,
            "<tr><td class=\"empty\" colspan=\"{COLUMNS}\">No employees yet.</td></tr>"
        )?;
    }
    // The index column is the row position, never the employee id. Delete posts
    // through the employee form so the typed draft travels with it.
    for (index, employee) in hr.employees().iter().enumerate() {
        writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><button type=\"submit\" class=\"btn delete\" form=\"{FORM_ID}\" \
             formaction=\"/employees/{}/delete\" formnovalidate>Delete</button></td></tr>",
            index + 1,
            escape(&employee.name),
            employee.age,
            employee.salary,
            escape(&employee.designation),
            employee.id,
        )?;
    }
    out.push_str("</tbody>\n</table>\n</section>\n");
    Ok(())
}

fn render_form(out: &mut String, draft: &EmployeeDraft) -> Result<()> {
    out.push_str("<section class=\"card\">\n<h2>Add Employee</h2>\n");
    writeln!(
        out,
        "<form id=\"{FORM_ID}\" class=\"form\" method=\"post\" action=\"/employees\">"
    )?;
    let fields = [
        ("name", "text", "Name", &draft.name),
        ("age", "number", "Age", &draft.age),
        ("salary", "number", "Salary (₹)", &draft.salary),
        ("designation", "text", "Designation", &draft.designation),
    ];
    for (name, kind, placeholder, value) in fields {
        writeln!(
            out,
            "<input name=\"{name}\" type=\"{kind}\" placeholder=\"{placeholder}\" value=\"{}\">",
            escape(value)
        )?;
    }
    out.push_str("<div style=\"display: flex; gap: 8px\">\n");
    out.push_str("<button type=\"submit\" class=\"btn primary\">Add</button>\n");
    out.push_str(
        "<button type=\"submit\" class=\"btn ghost\" formaction=\"/draft/clear\" \
         formnovalidate>Clear</button>\n",
    );
    out.push_str("</div>\n</form>\n</section>\n");
    Ok(())
}

fn render_raw_state(out: &mut String, hr: &HrModule) -> Result<()> {
    let raw = serde_json::to_string_pretty(hr.roster())?;
    out.push_str("<section class=\"card\">\n<h2>Raw state (for reference)</h2>\n");
    writeln!(out, "<pre>{}</pre>", escape(&raw))?;
    out.push_str("</section>\n");
    Ok(())
}

fn render_alert(out: &mut String, message: &str) -> Result<()> {
    // A JSON string is a valid JS literal; `<` is escaped so it cannot close the script tag.
    let literal = serde_json::to_string(message)?.replace('<', "\\u003c");
    writeln!(out, "<script>window.alert({literal});</script>")?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
