//! Wrapper page generation.

use crate::locate::ContentRef;
use crate::options::{PackageOptions, TestLoadFailure};
use quick_xml::escape::escape;

/// Relative path of the pre-test definition loaded by the wrapper page.
pub const PRETEST_PATH: &str = "test/pretest.json";

/// Relative path of the post-test definition loaded by the wrapper page.
pub const POSTTEST_PATH: &str = "test/posttest.json";

const BASE_STYLE: &str = "    iframe { width: 100%; height: 600px; border: 1px solid #ccc; margin-top: 10px; }
    pre { background: #f4f4f4; padding: 10px; overflow: auto; }
    section { margin-bottom: 30px; }
";

const ERROR_STYLE: &str = "    .test-error { color: #b00020; }
";

/// Render the `index.html` wrapper page.
///
/// The page embeds `content` in an inline frame between a pre-test and a
/// post-test section. The test sections are filled in the browser from
/// [`PRETEST_PATH`] and [`POSTTEST_PATH`]; those files are never generated
/// and must come with the input archive.
pub fn render_index(content: &ContentRef, options: &PackageOptions) -> String {
    let style = match options.test_load_failure {
        TestLoadFailure::Silent => BASE_STYLE.to_string(),
        TestLoadFailure::Visible => format!("{}{}", BASE_STYLE, ERROR_STYLE),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
{style}  </style>
</head>
<body>
  <h1>{heading}</h1>
  <section><h2>Pre-Test</h2><div id="pretest"></div></section>
  <section><h2>Main Content</h2><iframe src="{src}"></iframe></section>
  <section><h2>Post-Test</h2><div id="posttest"></div></section>
  <script>
{script}    loadTest("pretest", "{pretest}");
    loadTest("posttest", "{posttest}");
  </script>
</body>
</html>
"#,
        title = escape(options.page_title.as_str()),
        style = style,
        heading = escape(options.heading.as_str()),
        src = escape(content.as_str()),
        script = load_test_script(options.test_load_failure),
        pretest = PRETEST_PATH,
        posttest = POSTTEST_PATH,
    )
}

/// The `loadTest(id, jsonFile)` helper embedded in the page.
fn load_test_script(mode: TestLoadFailure) -> String {
    let on_failure = match mode {
        TestLoadFailure::Silent => "",
        TestLoadFailure::Visible => {
            "
        .catch(err => {
          document.getElementById(id).innerHTML =
            '<p class=\"test-error\">Could not load ' + jsonFile + ': ' + err.message + '</p>';
        })"
        }
    };

    format!(
        "    function loadTest(id, jsonFile) {{
      fetch(jsonFile)
        .then(res => res.json())
        .then(data => {{
          document.getElementById(id).innerHTML = '<pre>' + JSON.stringify(data, null, 2) + '</pre>';
        }}){on_failure};
    }}
",
        on_failure = on_failure
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_iframe() {
        let page = render_index(&ContentRef::new("chapter1.html"), &PackageOptions::default());
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>ICF Unified SCORM</title>"));
        assert!(page.contains("<h1>Interactive Course</h1>"));
        assert!(page.contains("<h2>Pre-Test</h2>"));
        assert!(page.contains("<h2>Main Content</h2>"));
        assert!(page.contains("<h2>Post-Test</h2>"));
        assert!(page.contains(r#"<iframe src="chapter1.html"></iframe>"#));
        assert!(page.contains("height: 600px"));
        assert!(page.contains("width: 100%"));
    }

    #[test]
    fn test_fetches_both_test_files() {
        let page = render_index(&ContentRef::new("chapter1.html"), &PackageOptions::default());
        assert!(page.contains(r#"loadTest("pretest", "test/pretest.json");"#));
        assert!(page.contains(r#"loadTest("posttest", "test/posttest.json");"#));
        assert!(page.contains("JSON.stringify(data, null, 2)"));
    }

    #[test]
    fn test_silent_failure_has_no_catch() {
        let page = render_index(&ContentRef::new("chapter1.html"), &PackageOptions::default());
        assert!(!page.contains(".catch("));
        assert!(!page.contains("test-error"));
        assert!(page.contains("</pre>';\n        });"));
    }

    #[test]
    fn test_visible_failure_renders_error() {
        let options = PackageOptions::new().with_test_load_failure(TestLoadFailure::Visible);
        let page = render_index(&ContentRef::new("chapter1.html"), &options);
        assert!(page.contains(".catch(err => {"));
        assert!(page.contains("Could not load"));
        assert!(page.contains(".test-error { color: #b00020; }"));
    }

    #[test]
    fn test_nested_content_path() {
        let page = render_index(
            &ContentRef::new("content/chapter2.html"),
            &PackageOptions::default(),
        );
        assert!(page.contains(r#"<iframe src="content/chapter2.html"></iframe>"#));
    }

    #[test]
    fn test_escapes_user_text() {
        let options = PackageOptions::new()
            .with_page_title("Q&A <Basics>")
            .with_heading("\"Quoted\"");
        let page = render_index(&ContentRef::new("chapter\"x.html"), &options);
        assert!(page.contains("<title>Q&amp;A &lt;Basics&gt;</title>"));
        assert!(page.contains("<h1>&quot;Quoted&quot;</h1>"));
        assert!(page.contains(r#"src="chapter&quot;x.html""#));
    }
}
