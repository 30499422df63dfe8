// src/form/render.rs

use std::time::Duration;

use maud::{Markup, html};
use serde_json::json;
use uuid::Uuid;

use super::preview::{PreviewField, Thumbnail};
use super::products::{BlockKey, ProductBlock, label_for_index};
use super::submit::{BUSY_LABEL, IDLE_LABEL, SubmitButton, SubmitRejection, SubmitState};
use super::theme::ThemePicker;
use super::FormController;
use crate::session::FORM_HEADER;

/// The whole builder form, rendered from the controller. Every htmx request
/// made from inside it carries `form_id` in the form header.
pub fn builder_form(form_id: Uuid, form: &FormController, submit_timeout: Duration) -> Markup {
    let headers = json!({ FORM_HEADER: form_id.to_string() }).to_string();
    html! {
        form #micrositeForm action="/create" method="post" enctype="multipart/form-data"
            "hx-post"="/create"
            "hx-swap"="none"
            "hx-disinherit"="hx-swap"
            "hx-headers"=(headers)
            data-form-id=(form_id)
            data-submit-reset-ms=(submit_timeout.as_millis())
            data-missing-name=(SubmitRejection::MissingBusinessName.to_string())
            data-missing-product=(SubmitRejection::NoNamedProduct.to_string())
        {
            div .card.mb-4 {
                div .card-header { h4 .mb-0 { i .fas.fa-store.me-2 {} "Business Information" } }
                div .card-body {
                    div .row {
                        div .col-md-6.mb-3 {
                            label .form-label for="business_name" { "Business Name *" }
                            input #business_name .form-control type="text" name="business_name" maxlength="100"
                                required pattern=".*\\S.*" title=(SubmitRejection::MissingBusinessName.to_string());
                        }
                        div .col-md-6.mb-3 {
                            label .form-label for="tagline" { "Tagline" }
                            input #tagline .form-control type="text" name="tagline" maxlength="200";
                        }
                    }
                    div .row {
                        div .col-md-6.mb-3 {
                            label .form-label for="email" { "Email" }
                            input #email .form-control type="email" name="email";
                        }
                        div .col-md-6.mb-3 {
                            label .form-label for="phone" { "Phone" }
                            input #phone .form-control type="tel" name="phone" maxlength="20";
                        }
                    }
                    div .mb-3 {
                        label .form-label for="address" { "Address" }
                        textarea #address .form-control name="address" rows="2" {}
                    }
                    div .row {
                        @for (name, label) in [("facebook", "Facebook"), ("instagram", "Instagram"), ("twitter", "Twitter")] {
                            div .col-md-4.mb-3 {
                                label .form-label for=(name) { (label) }
                                input .form-control id=(name) type="url" name=(name) placeholder="https://";
                            }
                        }
                    }
                    div .mb-3 {
                        label .form-label for="logo" { "Logo" }
                        (image_input(PreviewField::Logo, form.previews().get(PreviewField::Logo)))
                    }
                }
            }

            div .card.mb-4 {
                div .card-header { h4 .mb-0 { i .fas.fa-palette.me-2 {} "Choose a Theme" } }
                div .card-body { (theme_picker(form.theme())) }
            }

            div .card.mb-4 {
                div .card-header { h4 .mb-0 { i .fas.fa-box.me-2 {} "Products" } }
                div .card-body {
                    div #productsContainer {
                        @for (index, block) in form.products().iter().enumerate() {
                            (product_block(form, index, block))
                        }
                    }
                    button #addProductBtn .btn.btn-outline-primary type="button"
                        "hx-post"="/htmx/form/products"
                        "hx-target"="#productsContainer"
                        "hx-swap"="beforeend"
                        "hx-params"="none"
                    {
                        i .fas.fa-plus.me-2 {} "Add Another Product"
                    }
                }
            }

            div .text-center.mb-5 {
                (submit_button(form.submit_button(), false))
            }
        }
    }
}

/// One product block. Inputs are keyed so a block keeps its identity when
/// others around it are removed.
pub fn product_block(form: &FormController, index: usize, block: &ProductBlock) -> Markup {
    let field = PreviewField::Product(block.key);
    html! {
        div .product-item.border.rounded.p-3.mb-3 id=(format!("product-{}", block.key)) {
            (product_header(index, block.key, form.products().remove_visible(), false))
            input type="hidden" name="product_key" value=(block.key);
            div .row {
                div .col-md-4 {
                    div .mb-3 {
                        label .form-label { "Product Name *" }
                        input .form-control type="text" name="product_name" maxlength="100";
                    }
                }
                div .col-md-2 {
                    div .mb-3 {
                        label .form-label { "Price ($)" }
                        input .form-control type="number" name="product_price" step="0.01" min="0";
                    }
                }
                div .col-md-6 {
                    div .mb-3 {
                        label .form-label { "Image" }
                        (image_input(field, form.previews().get(field)))
                    }
                }
            }
            div .mb-3 {
                label .form-label { "Description" }
                textarea .form-control name="product_description" rows="2" {}
            }
        }
    }
}

/// Label plus remove control of a block. With `oob` set the header replaces
/// its old copy wherever it sits in the page.
pub fn product_header(index: usize, key: BlockKey, remove_visible: bool, oob: bool) -> Markup {
    let display = if remove_visible {
        "display: inline-block"
    } else {
        "display: none"
    };
    html! {
        div .d-flex.justify-content-between.align-items-center.mb-2
            id=(format!("product-head-{}", key))
            "hx-swap-oob"=[oob.then_some("true")]
        {
            h5 .mb-0 { (label_for_index(index)) }
            button .btn.btn-danger.btn-sm.remove-product type="button" style=(display)
                "hx-delete"=(format!("/htmx/form/products/{}", key))
                "hx-target"="closest .product-item"
                "hx-swap"="outerHTML"
                "hx-params"="none"
            {
                i .fas.fa-trash {}
            }
        }
    }
}

/// Out-of-band headers for every block except `skip`, so labels and remove
/// controls follow the current block list.
pub fn product_headers_oob(form: &FormController, skip: Option<BlockKey>) -> Markup {
    let visible = form.products().remove_visible();
    html! {
        @for (index, block) in form.products().iter().enumerate() {
            @if Some(block.key) != skip {
                (product_header(index, block.key, visible, true))
            }
        }
    }
}

pub fn theme_picker(picker: &ThemePicker) -> Markup {
    html! {
        div #theme-options .row {
            @for (theme, selected) in picker.options() {
                div .col-md-4.mb-3 {
                    div .theme-option.card.h-100.p-3.border.border-primary[selected]
                        "hx-post"=(format!("/htmx/form/theme/{}", theme))
                        "hx-trigger"="click"
                        "hx-target"="#theme-options"
                        "hx-swap"="outerHTML"
                        "hx-params"="none"
                    {
                        div .form-check {
                            input .form-check-input type="radio" name="theme"
                                id=(format!("theme-{}", theme)) value=(theme.to_string()) checked[selected];
                            label .form-check-label for=(format!("theme-{}", theme)) {
                                strong { (theme.label()) }
                            }
                        }
                        p .small.text-muted.mb-0 { (theme.description()) }
                    }
                }
            }
        }
    }
}

fn image_input(field: PreviewField, thumbnail: Option<&Thumbnail>) -> Markup {
    let input_name = field.input_name();
    html! {
        input .form-control type="file" name=(input_name) accept="image/*"
            "hx-post"=(format!("/htmx/form/preview/{}", field))
            "hx-trigger"="change"
            "hx-encoding"="multipart/form-data"
            "hx-params"=(input_name)
            "hx-target"=(format!("#preview-{}", field))
            "hx-swap"="innerHTML";
        div .image-preview.mt-2 id=(format!("preview-{}", field)) {
            (preview_content(thumbnail))
        }
    }
}

/// Contents of a preview slot: the thumbnail, or nothing.
pub fn preview_content(thumbnail: Option<&Thumbnail>) -> Markup {
    html! {
        @if let Some(thumbnail) = thumbnail {
            img .img-thumbnail src=(thumbnail.data_url) alt="Preview"
                width=(thumbnail.width) height=(thumbnail.height);
        }
    }
}

pub fn submit_button(button: &SubmitButton, oob: bool) -> Markup {
    let state = match button.state() {
        SubmitState::Idle => "idle",
        SubmitState::Submitting { .. } => "submitting",
    };
    html! {
        button #submitBtn .btn.btn-primary.btn-lg type="submit"
            disabled[button.is_disabled()]
            data-state=(state)
            aria-label=(button.label())
            "hx-swap-oob"=[oob.then_some("true")]
        {
            span .idle-label { i .fas.fa-magic.me-2 {} (IDLE_LABEL) }
            span .busy-label { i .fas.fa-spinner.fa-spin.me-2 {} (BUSY_LABEL) }
        }
    }
}
