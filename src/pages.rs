// src/pages.rs

use std::time::Duration;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use uuid::Uuid;

use crate::flash::Flash;
use crate::form::FormController;
use crate::form::render::builder_form;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";
const HTMX_JS: &str = "https://unpkg.com/htmx.org@2.0.4";

// Server-side rejections arrive as `HX-Trigger: showMessage`.
const SHOW_MESSAGE_JS: &str = r#"
document.body.addEventListener("showMessage", function (evt) {
    if (evt.detail && evt.detail.message) {
        alert(evt.detail.message);
    }
});
"#;

// The builder form is checked before anything is uploaded. While a submission
// is in flight the button stays disabled until the response arrives or the
// reset delay passes, whichever is first. The request itself is never cut off.
const BUILDER_FORM_JS: &str = r#"
(function () {
    var form = document.getElementById("micrositeForm");
    if (!form) {
        return;
    }
    var resetTimer = null;

    function setBusy(busy) {
        var button = document.getElementById("submitBtn");
        if (button) {
            button.disabled = busy;
            button.dataset.state = busy ? "submitting" : "idle";
        }
    }

    function blank(input) {
        return !input || input.value.trim() === "";
    }

    form.addEventListener("htmx:confirm", function (evt) {
        if (evt.detail.elt !== form) {
            return;
        }
        if (blank(form.querySelector("input[name='business_name']"))) {
            evt.preventDefault();
            alert(form.dataset.missingName);
            return;
        }
        var names = form.querySelectorAll("input[name='product_name']");
        if (Array.prototype.every.call(names, blank)) {
            evt.preventDefault();
            alert(form.dataset.missingProduct);
        }
    });

    form.addEventListener("htmx:beforeRequest", function (evt) {
        if (evt.detail.elt !== form) {
            return;
        }
        setBusy(true);
        clearTimeout(resetTimer);
        resetTimer = setTimeout(function () {
            setBusy(false);
        }, Number(form.dataset.submitResetMs));
    });

    form.addEventListener("htmx:afterRequest", function (evt) {
        if (evt.detail.elt !== form) {
            return;
        }
        clearTimeout(resetTimer);
        setBusy(false);
    });
})();
"#;

pub fn layout(title: &str, flashes: &[Flash], content: Markup) -> Markup {
    layout_with_script(title, flashes, content, None)
}

fn layout_with_script(
    title: &str,
    flashes: &[Flash],
    content: Markup,
    script: Option<&str>,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href=(BOOTSTRAP_CSS);
                link rel="stylesheet" href=(FONT_AWESOME_CSS);
                link rel="stylesheet" href="/static/css/main.css";
                script src=(HTMX_JS) {}
            }
            body {
                nav .navbar.navbar-dark.bg-dark.mb-4 {
                    div .container {
                        a .navbar-brand href="/" { i .fas.fa-globe.me-2 {} "Microsite Builder" }
                    }
                }
                main .container {
                    @for flash in flashes {
                        div class=(format!("alert {} alert-dismissible", flash.kind.alert_class())) role="alert" {
                            (flash.message)
                        }
                    }
                    (content)
                }
                script { (PreEscaped(SHOW_MESSAGE_JS)) }
                @if let Some(script) = script {
                    script { (PreEscaped(script)) }
                }
            }
        }
    }
}

pub fn builder_page(
    form_id: Uuid,
    form: &FormController,
    submit_timeout: Duration,
    flashes: &[Flash],
) -> Markup {
    layout_with_script(
        "Microsite Builder",
        flashes,
        html! {
            div .text-center.mb-4 {
                h1 { "Create Your Business Microsite" }
                p .lead.text-muted { "Fill in your details, pick a theme, and get a ready-to-host website." }
            }
            (builder_form(form_id, form, submit_timeout))
        },
        Some(BUILDER_FORM_JS),
    )
}

pub fn preview_page(slug: &str, flashes: &[Flash]) -> Markup {
    layout(
        "Microsite Preview",
        flashes,
        html! {
            div .d-flex.justify-content-between.align-items-center.mb-3 {
                h2 .mb-0 { "Your microsite is ready" }
                div {
                    a .btn.btn-success.me-2 href=(format!("/download/{}", slug)) {
                        i .fas.fa-download.me-2 {} "Download ZIP"
                    }
                    a .btn.btn-outline-secondary href="/" { "Create Another" }
                }
            }
            div .ratio.ratio-16x9.border.rounded {
                iframe src=(format!("/sites/{}/index.html", slug)) title="Microsite preview" {}
            }
        },
    )
}
