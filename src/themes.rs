// src/themes.rs

use maud::{DOCTYPE, Markup, html};

use crate::models::{Business, Microsite, Product, Theme, format_price};

/// Pages every generated microsite has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePage {
    Home,
    Products,
    About,
}

impl SitePage {
    pub const ALL: [SitePage; 3] = [SitePage::Home, SitePage::Products, SitePage::About];

    pub fn file_name(&self) -> &'static str {
        match self {
            SitePage::Home => "index.html",
            SitePage::Products => "products.html",
            SitePage::About => "about.html",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            SitePage::Home => "Home",
            SitePage::Products => "Products",
            SitePage::About => "About",
        }
    }
}

/// Site-relative image paths, resolved by the generator after copying.
#[derive(Debug, Clone, Default)]
pub struct SiteImages {
    pub logo: Option<String>,
    /// Parallel to `Microsite::products`.
    pub products: Vec<Option<String>>,
}

impl SiteImages {
    fn product(&self, index: usize) -> Option<&str> {
        self.products.get(index).and_then(|p| p.as_deref())
    }
}

const FEATURED_PRODUCTS: usize = 3;

pub fn render_page(page: SitePage, site: &Microsite, images: &SiteImages) -> Markup {
    let business = &site.business;
    let theme = business.theme;
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page.title()) " | " (business.name) }
                @if let Some(fonts) = font_link(theme) {
                    link rel="stylesheet" href=(fonts);
                }
                link rel="stylesheet" href="assets/style.css";
            }
            body class=(format!("theme-{}", theme)) {
                (site_header(page, business, images))
                main .container {
                    @match page {
                        SitePage::Home => (home(site, images)),
                        SitePage::Products => (product_grid(&site.products, images)),
                        SitePage::About => (about(business)),
                    }
                }
                footer .site-footer {
                    p { "© " (business.created_at.format("%Y").to_string()) " " (business.name) }
                }
            }
        }
    }
}

fn site_header(current: SitePage, business: &Business, images: &SiteImages) -> Markup {
    html! {
        header .site-header {
            div .container.header-inner {
                a .brand href="index.html" {
                    @if let Some(logo) = &images.logo {
                        img .logo src=(logo) alt={ (business.name) " logo" };
                    }
                    span .brand-name { (business.name) }
                }
                nav .site-nav {
                    @for page in SitePage::ALL {
                        a.active[page == current] href=(page.file_name()) { (page.title()) }
                    }
                }
            }
        }
    }
}

fn home(site: &Microsite, images: &SiteImages) -> Markup {
    let business = &site.business;
    let featured = &site.products[..site.products.len().min(FEATURED_PRODUCTS)];
    html! {
        section .hero {
            h1 { (business.name) }
            @if let Some(tagline) = &business.tagline {
                p .tagline { (tagline) }
            }
            a .button href="products.html" { "View products" }
        }
        @if !featured.is_empty() {
            section .featured {
                h2 { "Featured" }
                (product_grid(featured, images))
            }
        }
    }
}

fn product_grid(products: &[Product], images: &SiteImages) -> Markup {
    html! {
        div .product-grid {
            @for (index, product) in products.iter().enumerate() {
                article .product-card {
                    @if let Some(src) = images.product(index) {
                        img .product-image src=(src) alt=(product.name);
                    }
                    div .product-body {
                        h3 { (product.name) }
                        p .price { (format_price(product.price)) }
                        @if let Some(description) = &product.description {
                            @for line in description.lines() {
                                (line) br;
                            }
                        }
                    }
                }
            }
        }
    }
}

fn about(business: &Business) -> Markup {
    let socials = [
        ("Facebook", &business.facebook),
        ("Instagram", &business.instagram),
        ("Twitter", &business.twitter),
    ];
    html! {
        section .about {
            h1 { "About " (business.name) }
            @if let Some(tagline) = &business.tagline {
                p .tagline { (tagline) }
            }
            dl .contact {
                @if let Some(email) = &business.email {
                    dt { "Email" }
                    dd { a href=(format!("mailto:{}", email)) { (email) } }
                }
                @if let Some(phone) = &business.phone {
                    dt { "Phone" }
                    dd { a href=(format!("tel:{}", phone)) { (phone) } }
                }
                @if let Some(address) = &business.address {
                    dt { "Address" }
                    dd { @for line in address.lines() { (line) br; } }
                }
            }
            ul .socials {
                @for (label, link) in socials {
                    @if let Some(url) = link {
                        li { a href=(url) rel="noopener" target="_blank" { (label) } }
                    }
                }
            }
        }
    }
}

fn font_link(theme: Theme) -> Option<&'static str> {
    match theme {
        Theme::Minimal => None,
        Theme::Modern => Some("https://fonts.googleapis.com/css2?family=Inter:wght@400;700&display=swap"),
        Theme::Fancy => Some(
            "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;700&family=Lora&display=swap",
        ),
    }
}

pub fn stylesheet(theme: Theme) -> &'static str {
    match theme {
        Theme::Minimal => MINIMAL_CSS,
        Theme::Modern => MODERN_CSS,
        Theme::Fancy => FANCY_CSS,
    }
}

const MINIMAL_CSS: &str = r#"* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; color: #222; background: #fff; line-height: 1.6; }
.container { max-width: 960px; margin: 0 auto; padding: 0 1.25rem; }
.site-header { border-bottom: 1px solid #eee; padding: 1rem 0; }
.header-inner { display: flex; justify-content: space-between; align-items: center; }
.brand { display: flex; align-items: center; gap: .75rem; color: inherit; text-decoration: none; font-weight: 600; }
.logo { max-height: 48px; }
.site-nav a { margin-left: 1.25rem; color: #555; text-decoration: none; }
.site-nav a.active { color: #000; border-bottom: 2px solid #000; }
.hero { padding: 4rem 0 2rem; }
.hero h1 { font-size: 2.5rem; margin: 0 0 .5rem; }
.tagline { color: #666; font-size: 1.15rem; }
.button { display: inline-block; margin-top: 1rem; padding: .6rem 1.2rem; border: 1px solid #222; color: #222; text-decoration: none; }
.product-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1.5rem; margin: 2rem 0; }
.product-card { border: 1px solid #eee; }
.product-image { width: 100%; display: block; }
.product-body { padding: 1rem; }
.price { font-weight: 600; }
.contact dt { font-weight: 600; margin-top: 1rem; }
.contact dd { margin: 0; }
.socials { list-style: none; padding: 0; display: flex; gap: 1rem; }
.site-footer { text-align: center; color: #999; padding: 2rem 0; border-top: 1px solid #eee; margin-top: 3rem; }
"#;

const MODERN_CSS: &str = r#"* { box-sizing: border-box; }
body { margin: 0; font-family: "Inter", system-ui, sans-serif; color: #1f2937; background: #f3f4f6; line-height: 1.6; }
.container { max-width: 1100px; margin: 0 auto; padding: 0 1.5rem; }
.site-header { background: #111827; color: #fff; padding: 1rem 0; position: sticky; top: 0; z-index: 10; }
.header-inner { display: flex; justify-content: space-between; align-items: center; }
.brand { display: flex; align-items: center; gap: .75rem; color: #fff; text-decoration: none; font-weight: 700; }
.logo { max-height: 44px; border-radius: 8px; background: #fff; padding: 2px; }
.site-nav a { margin-left: 1.5rem; color: #d1d5db; text-decoration: none; font-weight: 500; }
.site-nav a.active, .site-nav a:hover { color: #60a5fa; }
.hero { margin: 2rem 0; padding: 5rem 2rem; border-radius: 16px; color: #fff; text-align: center; background: linear-gradient(135deg, #2563eb, #7c3aed); }
.hero h1 { font-size: 3rem; margin: 0; }
.tagline { font-size: 1.25rem; opacity: .9; }
.button { display: inline-block; margin-top: 1.5rem; padding: .75rem 1.75rem; border-radius: 999px; background: #fff; color: #2563eb; font-weight: 700; text-decoration: none; }
.product-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1.5rem; margin: 2rem 0; }
.product-card { background: #fff; border-radius: 12px; overflow: hidden; box-shadow: 0 10px 25px rgba(0,0,0,.06); transition: transform .2s; }
.product-card:hover { transform: translateY(-4px); }
.product-image { width: 100%; height: 200px; object-fit: cover; display: block; }
.product-body { padding: 1.25rem; }
.price { color: #2563eb; font-weight: 700; font-size: 1.2rem; }
.about { background: #fff; border-radius: 12px; padding: 2rem; margin: 2rem 0; }
.contact dt { font-weight: 700; margin-top: 1rem; }
.contact dd { margin: 0; }
.socials { list-style: none; padding: 0; display: flex; gap: 1rem; }
.socials a { padding: .4rem 1rem; border-radius: 999px; background: #e0e7ff; color: #3730a3; text-decoration: none; }
.site-footer { text-align: center; color: #6b7280; padding: 2rem 0; }
"#;

const FANCY_CSS: &str = r#"* { box-sizing: border-box; }
body { margin: 0; font-family: "Lora", Georgia, serif; color: #3b2f2f; background: #fbf7f0; line-height: 1.7; }
h1, h2, h3, .brand-name { font-family: "Playfair Display", Georgia, serif; }
.container { max-width: 1000px; margin: 0 auto; padding: 0 1.5rem; }
.site-header { padding: 1.5rem 0; border-bottom: 3px double #c8a97e; }
.header-inner { display: flex; flex-direction: column; align-items: center; gap: .75rem; }
.brand { display: flex; align-items: center; gap: 1rem; color: #5a3e2b; text-decoration: none; font-size: 1.75rem; }
.logo { max-height: 64px; border-radius: 50%; border: 2px solid #c8a97e; }
.site-nav a { margin: 0 1rem; color: #8b6b4a; text-decoration: none; letter-spacing: .1em; text-transform: uppercase; font-size: .85rem; }
.site-nav a.active { color: #5a3e2b; border-bottom: 1px solid #c8a97e; }
.hero { text-align: center; padding: 4rem 1rem; }
.hero h1 { font-size: 3.25rem; margin: 0; color: #5a3e2b; }
.hero h1::after { content: "\2766"; display: block; font-size: 1.5rem; color: #c8a97e; margin-top: .5rem; }
.tagline { font-style: italic; font-size: 1.2rem; color: #8b6b4a; }
.button { display: inline-block; margin-top: 1.5rem; padding: .7rem 2rem; border: 1px solid #c8a97e; color: #5a3e2b; text-decoration: none; letter-spacing: .1em; text-transform: uppercase; font-size: .85rem; }
.button:hover { background: #c8a97e; color: #fff; }
.featured h2 { text-align: center; }
.product-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 2rem; margin: 2rem 0; }
.product-card { background: #fff; border: 1px solid #eadbc8; padding: .75rem; }
.product-image { width: 100%; display: block; }
.product-body { padding: 1rem .5rem; text-align: center; }
.price { color: #a0522d; font-style: italic; }
.about { text-align: center; padding: 2rem 0; }
.contact dt { font-family: "Playfair Display", serif; margin-top: 1rem; }
.contact dd { margin: 0; }
.socials { list-style: none; padding: 0; display: flex; justify-content: center; gap: 1.5rem; }
.site-footer { text-align: center; color: #8b6b4a; padding: 2rem 0; border-top: 3px double #c8a97e; margin-top: 3rem; font-style: italic; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(theme: Theme) -> Microsite {
        let now = Utc::now();
        Microsite {
            business: Business {
                id: 1,
                name: "Acme & Sons".into(),
                tagline: Some("Quality since 1900".into()),
                email: Some("hi@acme.test".into()),
                phone: None,
                address: Some("1 Main St\nSpringfield".into()),
                facebook: Some("https://facebook.com/acme".into()),
                instagram: None,
                twitter: None,
                logo_path: None,
                theme,
                created_at: now,
            },
            products: (0..4)
                .map(|i| Product {
                    id: i,
                    business_id: 1,
                    position: i,
                    name: format!("Widget {}", i),
                    price: 1999,
                    description: None,
                    image_path: None,
                    created_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn home_page_escapes_and_features_three_products() {
        let html = render_page(SitePage::Home, &sample(Theme::Modern), &SiteImages::default())
            .into_string();
        assert!(html.contains("Acme &amp; Sons"));
        assert!(html.contains("theme-modern"));
        assert!(html.contains("Widget 2"));
        assert!(!html.contains("Widget 3"));
    }

    #[test]
    fn products_page_lists_everything_with_images() {
        let images = SiteImages {
            logo: Some("images/logo.png".into()),
            products: vec![None, Some("images/product_1.png".into())],
        };
        let html = render_page(SitePage::Products, &sample(Theme::Fancy), &images).into_string();
        assert!(html.contains("Widget 3"));
        assert!(html.contains("$19.99"));
        assert!(html.contains(r#"src="images/product_1.png""#));
        assert!(html.contains(r#"src="images/logo.png""#));
    }

    #[test]
    fn about_page_shows_only_present_contacts() {
        let html = render_page(SitePage::About, &sample(Theme::Minimal), &SiteImages::default())
            .into_string();
        assert!(html.contains("mailto:hi@acme.test"));
        assert!(html.contains("Facebook"));
        assert!(!html.contains("Instagram"));
        assert!(!html.contains("tel:"));
    }

    #[test]
    fn every_theme_has_a_stylesheet() {
        for theme in [Theme::Minimal, Theme::Modern, Theme::Fancy] {
            assert!(stylesheet(theme).contains(".product-grid"));
        }
    }
}
