use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{load_catalog, load_model_images};
use crate::classify::{classify, meta_lines};
use crate::config::SiteConfig;
use crate::filter::{client_script, ALL};
use crate::html::{asset_href, badge, html_escape, page_stem, select_options};
use crate::lightbox::lightbox_script;
use crate::options::{extract_filter_options, FilterOptions};
use crate::types::{ModelImages, Theme, ThemeType};
use crate::utils::osc8_file_link;

/// Files written by one generation run
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub home: PathBuf,
    pub pages: Vec<PathBuf>,
    pub script: PathBuf,
}

/// Generate page header HTML.
/// `root` is the relative path back to the site root ("" or "../").
fn page_header(title: &str, root: &str, nav_html: &str, body_attrs: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{root}css/style.css">
</head>
<body{body_attrs}>
    <header>
        <h1>{title}</h1>
        <nav>{nav_html}</nav>
    </header>
    <main>
"#,
        title = html_escape(title),
        root = root,
        nav_html = nav_html,
        body_attrs = body_attrs
    )
}

/// Generate page footer HTML, closing `<main>` and the document
fn page_footer(footer: &str, script_html: &str) -> String {
    format!(
        r#"    </main>
    <footer>
        <p>{}</p>
    </footer>
{}
</body>
</html>
"#,
        html_escape(footer),
        script_html
    )
}

/// Labelled `<select>` for one filter control
fn filter_select(label: &str, id: &str, options_html: &str) -> String {
    format!(
        r#"        <label>
            {}:
            <select id="{}">
            {}
            </select>
        </label>
"#,
        label, id, options_html
    )
}

fn type_select_options() -> String {
    let mut html = format!(r#"<option value="{}">All</option>"#, ALL);
    for theme_type in ThemeType::ALL {
        html.push_str(&format!(
            "\n            <option value=\"{}\">{}</option>",
            theme_type.as_str(),
            theme_type.label()
        ));
    }
    html
}

/// Image-enhanced model buttons, one per catalog model
fn model_picker_html(models: &[String], images: &ModelImages) -> String {
    let mut html = String::from("    <section class=\"model-picker\">\n");
    for model in models {
        let name = html_escape(model);
        let image_html = images
            .get(model)
            .filter(|src| !src.is_empty())
            .map(|src| format!(r#"<img src="{}" alt="{}">"#, asset_href("", src), name))
            .unwrap_or_default();
        html.push_str(&format!(
            "        <button type=\"button\" data-model=\"{}\">{}<span>{}</span></button>\n",
            name, image_html, name
        ));
    }
    html.push_str("    </section>\n");
    html
}

/// Catalog URL the browser fetches, relative to the site root
fn catalog_url(config: &SiteConfig) -> String {
    config
        .catalog
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "themes.json".to_string())
}

/// Render the home page. Cards are left to the client script; the page
/// only carries the filter controls and an empty list container.
pub fn render_home_page(
    options: &FilterOptions,
    model_images: Option<&ModelImages>,
    config: &SiteConfig,
) -> String {
    let body_attrs = format!(
        r#" data-catalog="{}" data-pages-dir="{}" data-type-precedence="{}""#,
        html_escape(&catalog_url(config)),
        html_escape(&config.pages_dir),
        config.type_precedence.as_str()
    );
    let mut html = page_header(
        &config.title,
        "",
        r#"<a href="index.html">Home</a>"#,
        &body_attrs,
    );

    html.push_str(
        r#"    <section class="search">
        <input type="search" id="searchInput" placeholder="Search by name, model, author, platform...">
    </section>
    <div class="error-box" id="errorBox" style="display:none"></div>
"#,
    );

    html.push_str("    <section class=\"filters\">\n");
    html.push_str(&filter_select("Model", "modelFilter", &select_options(&options.models)));
    html.push_str(&filter_select(
        "Platform",
        "platformFilter",
        &select_options(&options.platforms),
    ));
    html.push_str(&filter_select(
        "Resolution",
        "resolutionFilter",
        &select_options(&options.resolutions),
    ));
    html.push_str(&filter_select("Type", "typeFilter", &type_select_options()));
    html.push_str("    </section>\n");

    if let Some(images) = model_images {
        html.push_str(&model_picker_html(&options.models, images));
    }

    html.push_str("    <section class=\"themes\" id=\"themeList\"></section>\n");
    html.push_str(&page_footer(
        &config.footer,
        r#"<script src="js/main.js"></script>"#,
    ));
    html
}

fn download_button(class: &str, href: &str, label: &str) -> String {
    format!(
        r#"<a class="{}" href="{}" download>⬇️ {}</a>"#,
        class,
        asset_href("../", href),
        label
    )
}

/// Render one theme's detail page
pub fn render_theme_page(theme: &Theme, config: &SiteConfig) -> String {
    let name = html_escape(&theme.name);
    let mut html = page_header(
        &theme.name,
        "../",
        r#"<a href="../index.html">⬅ Home</a>"#,
        "",
    );

    html.push_str("    <section class=\"theme-details\">\n");

    // Badge row
    let theme_type = classify(theme, config.type_precedence);
    let mut badges = vec![badge("resolution", &theme.resolution)];
    if let Some(home_type) = theme.home_type() {
        badges.push(badge("home-type", home_type));
    }
    badges.push(badge(&format!("type-{}", theme_type.as_str()), theme_type.label()));
    html.push_str(&format!(
        "      <div class=\"badges\">{}</div>\n",
        badges.join("\n        ")
    ));

    // Meta block
    for line in meta_lines(theme) {
        html.push_str(&format!(
            "      <p><strong>{}:</strong> {}</p>\n",
            line.label,
            html_escape(&line.value)
        ));
    }
    let models: Vec<&str> = theme.models().collect();
    html.push_str(&format!(
        "      <p><strong>Supported models:</strong> {}</p>\n",
        html_escape(&models.join(", "))
    ));
    html.push_str(&format!(
        "      <p><strong>Platform:</strong> {}</p>\n",
        html_escape(&theme.platform.joined(", "))
    ));

    if let Some(note) = theme.note() {
        html.push_str(&format!(
            "      <div class=\"note\"><p>{}</p></div>\n",
            html_escape(note)
        ));
    }

    // Gallery
    html.push_str("      <h2>Screenshots</h2>\n      <div class=\"screenshots\">\n");
    for (i, shot) in theme.screenshots.iter().enumerate() {
        html.push_str(&format!(
            "        <img src=\"{}\" alt=\"{} screenshot {}\" data-index=\"{}\">\n",
            asset_href("../", shot),
            name,
            i + 1,
            i
        ));
    }
    html.push_str("      </div>\n");

    // Downloads
    html.push_str(&format!(
        "      {}\n",
        download_button("download-btn", &theme.file, "Download this Theme")
    ));
    if let Some(swf) = theme.swf() {
        html.push_str(&format!(
            "      {}\n",
            download_button("download-btn secondary", swf, "Download Flash Menu")
        ));
    }

    if !theme.alternate_flash_menus.is_empty() {
        html.push_str("      <h2>Alternate Flash Menus</h2>\n      <div class=\"alt-menus\">\n");
        for (i, menu) in theme.alternate_flash_menus.iter().enumerate() {
            html.push_str("        <div class=\"alt-menu\">\n");
            html.push_str(&format!(
                "          <img src=\"{}\" alt=\"{} alternate menu {}\" data-index=\"{}\">\n",
                asset_href("../", &menu.screenshot),
                name,
                i + 1,
                i
            ));
            if let Some(note) = menu.note.as_deref().filter(|n| !n.is_empty()) {
                html.push_str(&format!(
                    "          <p class=\"note\">{}</p>\n",
                    html_escape(note)
                ));
            }
            html.push_str(&format!(
                "          {}\n",
                download_button("download-btn", &menu.file, "Download this Flash Menu")
            ));
            html.push_str("        </div>\n");
        }
        html.push_str("      </div>\n");
    }

    html.push_str("    </section>\n");

    // Lightbox containers: the main gallery gets arrows, alternates do not
    html.push_str(
        r#"    <div class="lightbox" id="lightbox">
      <button type="button" class="lightbox-prev" aria-label="Previous">&#10094;</button>
      <img alt="">
      <button type="button" class="lightbox-next" aria-label="Next">&#10095;</button>
    </div>
    <div class="lightbox" id="altLightbox">
      <img alt="">
    </div>
"#,
    );

    html.push_str(&page_footer(
        &config.footer,
        &format!("<script>{}</script>", lightbox_script()),
    ));
    html
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the home page, every detail page and the client script.
///
/// Pages are overwritten on every run; pages for ids no longer in the
/// catalog are left in place.
pub fn write_site(
    themes: &[Theme],
    model_images: Option<&ModelImages>,
    config: &SiteConfig,
) -> Result<GenerateReport> {
    let pages_dir = config.pages_path();
    fs::create_dir_all(&pages_dir)
        .with_context(|| format!("Failed to create {}", pages_dir.display()))?;

    let options = extract_filter_options(themes);
    debug!(
        "Filter options: {} models, {} platforms, {} resolutions",
        options.models.len(),
        options.platforms.len(),
        options.resolutions.len()
    );

    let mut report = GenerateReport {
        home: config.home_path(),
        script: config.script_path(),
        ..Default::default()
    };

    write_file(&report.home, &render_home_page(&options, model_images, config))?;
    println!("  Wrote {}", report.home.display());

    for theme in themes {
        let path = pages_dir.join(format!("{}.html", page_stem(&theme.id)));
        write_file(&path, &render_theme_page(theme, config))?;
        println!("  Wrote {}", path.display());
        report.pages.push(path);
    }

    if let Some(script_dir) = report.script.parent() {
        fs::create_dir_all(script_dir)
            .with_context(|| format!("Failed to create {}", script_dir.display()))?;
    }
    write_file(&report.script, &client_script())?;
    println!("  Wrote {}", report.script.display());

    Ok(report)
}

/// Main generation function
pub fn run_generate(config: &SiteConfig) -> Result<()> {
    println!("Loading themes from {}...", config.catalog.display());
    let themes = load_catalog(&config.catalog)?;
    println!("Loaded {} themes", themes.len());

    let model_images = match &config.model_images {
        Some(path) => load_model_images(path)?,
        None => None,
    };
    if let Some(images) = &model_images {
        info!("Loaded {} model images", images.len());
    }

    println!("Generating pages...");
    let report = write_site(&themes, model_images.as_ref(), config)?;

    println!(
        "Done! Generated {} theme pages and {}",
        report.pages.len(),
        osc8_file_link(&report.home, &report.home.display().to_string())
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use crate::classify::TypePrecedence;
    use crate::types::{AlternateFlashMenu, OneOrMany};
    use scraper::{Html, Selector};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"[{
        "id": "a",
        "name": "A",
        "supportedModels": ["X1"],
        "platform": "P1",
        "resolution": "128x160",
        "originalModel": "X1",
        "screenshots": ["s1.png"],
        "file": "a.zip"
    }]"#;

    fn config_in(dir: &Path) -> SiteConfig {
        SiteConfig {
            output_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    fn option_values(html: &str, select_id: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(&format!("#{} option", select_id)).unwrap();
        doc.select(&selector)
            .filter_map(|o| o.value().attr("value").map(str::to_string))
            .collect()
    }

    fn theme(id: &str) -> Theme {
        Theme {
            id: id.to_string(),
            name: format!("Theme {}", id),
            supported_models: vec!["K750i".to_string(), "W800i".to_string()],
            original_model: OneOrMany::Many(vec!["K750i".into(), "W800i".into()]),
            platform: OneOrMany::One("A100".into()),
            resolution: "176x220".to_string(),
            screenshots: vec!["img/one.png".into(), "img/two.png".into()],
            file: format!("themes/{}.thm", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_site_sample_catalog() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let themes = parse_catalog(SAMPLE, "sample").unwrap();

        let report = write_site(&themes, None, &config).unwrap();
        assert_eq!(report.pages, vec![dir.path().join("themes-pages").join("a.html")]);

        let page = fs::read_to_string(&report.pages[0]).unwrap();
        assert!(page.contains("<h1>A</h1>"));
        assert!(page.contains("128x160"));
        assert!(page.contains(r#"src="../s1.png""#));
        assert!(page.contains(r#"href="../a.zip""#));

        let home = fs::read_to_string(&report.home).unwrap();
        assert_eq!(option_values(&home, "platformFilter"), vec!["all", "P1"]);
        assert!(report.script.exists());
    }

    #[test]
    fn test_write_site_is_idempotent_and_keeps_stale_pages() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        write_site(&[theme("old"), theme("kept")], None, &config).unwrap();
        write_site(&[theme("kept")], None, &config).unwrap();

        assert!(dir.path().join("themes-pages/old.html").exists());
        assert!(dir.path().join("themes-pages/kept.html").exists());
    }

    #[test]
    fn test_write_site_keeps_path_like_ids_inside_pages_dir() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let report = write_site(&[theme("../index"), theme("a/b")], None, &config).unwrap();

        let pages_dir = dir.path().join("themes-pages");
        assert_eq!(
            report.pages,
            vec![pages_dir.join("..%2Findex.html"), pages_dir.join("a%2Fb.html")]
        );
        for page in &report.pages {
            assert_eq!(page.parent(), Some(pages_dir.as_path()));
            assert!(page.exists());
        }

        let home = fs::read_to_string(&report.home).unwrap();
        assert!(home.contains(r#"id="modelFilter""#));
        assert!(!dir.path().join("a").exists());
    }

    #[test]
    fn test_home_page_options_round_trip() {
        let mut second = theme("b");
        second.supported_models = vec!["T610".into(), "K750i".into()];
        second.platform = OneOrMany::Many(vec!["A1".into(), "A100".into()]);
        second.resolution = "128x160".into();
        let themes = vec![theme("a"), second];
        let options = extract_filter_options(&themes);

        let html = render_home_page(&options, None, &SiteConfig::default());
        let expect = |values: &[String]| {
            let mut all = vec!["all".to_string()];
            all.extend(values.iter().cloned());
            all
        };
        assert_eq!(option_values(&html, "modelFilter"), expect(&options.models));
        assert_eq!(option_values(&html, "platformFilter"), expect(&options.platforms));
        assert_eq!(option_values(&html, "resolutionFilter"), expect(&options.resolutions));
        assert_eq!(option_values(&html, "modelFilter"), vec!["all", "K750i", "T610", "W800i"]);
    }

    #[test]
    fn test_home_page_for_empty_catalog() {
        let html = render_home_page(&extract_filter_options(&[]), None, &SiteConfig::default());
        for id in ["modelFilter", "platformFilter", "resolutionFilter"] {
            assert_eq!(option_values(&html, id), vec!["all"]);
        }
        assert_eq!(
            option_values(&html, "typeFilter"),
            vec!["all", "user", "carrier", "preloaded"]
        );
    }

    #[test]
    fn test_home_page_has_no_theme_markup() {
        let themes = vec![theme("a")];
        let html = render_home_page(&extract_filter_options(&themes), None, &SiteConfig::default());
        assert!(!html.contains("Theme a"));
        assert!(html.contains(r#"<section class="themes" id="themeList"></section>"#));
        assert!(html.contains(r#"data-type-precedence="author-first""#));
        assert!(html.contains(r#"<script src="js/main.js"></script>"#));
        assert!(!html.contains("model-picker"));
    }

    #[test]
    fn test_home_page_model_picker() {
        let themes = vec![theme("a")];
        let mut images = ModelImages::new();
        images.insert("K750i".into(), "img/models/k750i.png".into());
        let html = render_home_page(
            &extract_filter_options(&themes),
            Some(&images),
            &SiteConfig::default(),
        );
        assert!(html.contains(r#"data-model="K750i"><img src="img/models/k750i.png" alt="K750i">"#));
        assert!(html.contains(r#"data-model="W800i"><span>W800i</span>"#));
    }

    #[test]
    fn test_detail_page_author_meta() {
        let mut t = theme("a");
        t.author = Some("Beamish".into());
        t.carrier = Some("Orange".into());
        let html = render_theme_page(&t, &SiteConfig::default());
        assert!(html.contains("<strong>Author:</strong> Beamish"));
        assert!(!html.contains("Preloaded on"));
        assert!(!html.contains("<strong>Carrier:</strong>"));
        assert!(html.contains(r#"<span class="badge type-user">User-made</span>"#));
    }

    #[test]
    fn test_detail_page_preloaded_meta() {
        let mut t = theme("a");
        t.carrier = Some("Orange".into());
        let html = render_theme_page(&t, &SiteConfig::default());
        assert!(html.contains("<strong>Preloaded on:</strong> K750i, W800i"));
        assert!(html.contains("<strong>Carrier:</strong> Orange"));
        assert!(!html.contains("Author:"));
        assert!(html.contains(r#"<span class="badge type-carrier">Carrier</span>"#));
    }

    #[test]
    fn test_detail_page_type_badge_follows_precedence() {
        let mut t = theme("a");
        t.author = Some("Beamish".into());
        t.carrier = Some("Orange".into());
        let config = SiteConfig {
            type_precedence: TypePrecedence::CarrierFirst,
            ..Default::default()
        };
        let html = render_theme_page(&t, &config);
        assert!(html.contains(r#"<span class="badge type-carrier">Carrier</span>"#));
        // Meta block is unaffected by precedence
        assert!(html.contains("<strong>Author:</strong> Beamish"));
    }

    #[test]
    fn test_detail_page_sections() {
        let mut t = theme("a");
        t.home_type = Some("Flash".into());
        t.note = Some("Needs firmware R1A".into());
        t.swf = Some("swf/menu.swf".into());
        t.alternate_flash_menus = vec![
            AlternateFlashMenu {
                screenshot: "img/alt1.png".into(),
                file: "swf/alt1.swf".into(),
                note: Some("Blue icons".into()),
            },
            AlternateFlashMenu {
                screenshot: "img/alt2.png".into(),
                file: "swf/alt2.swf".into(),
                note: None,
            },
        ];
        let html = render_theme_page(&t, &SiteConfig::default());

        assert!(html.contains(r#"<span class="badge home-type">Flash</span>"#));
        assert!(html.contains("<strong>Supported models:</strong> K750i, W800i"));
        assert!(html.contains("<strong>Platform:</strong> A100"));
        assert!(html.contains("Needs firmware R1A"));

        let one = html.find(r#"src="../img/one.png""#).unwrap();
        let two = html.find(r#"src="../img/two.png""#).unwrap();
        assert!(one < two);
        assert!(html.contains(r#"data-index="1""#));

        assert!(html.contains(r#"href="../themes/a.thm" download"#));
        assert!(html.contains(r#"href="../swf/menu.swf" download"#));
        assert_eq!(html.matches("class=\"alt-menu\"").count(), 2);
        assert!(html.contains(r#"href="../swf/alt2.swf" download"#));
        assert!(html.contains("Blue icons"));
        assert!(html.contains("id=\"altLightbox\""));
    }

    #[test]
    fn test_detail_page_omits_optional_sections() {
        let html = render_theme_page(&theme("a"), &SiteConfig::default());
        assert!(!html.contains("home-type"));
        assert!(!html.contains("class=\"note\""));
        assert!(!html.contains("Download Flash Menu"));
        assert!(!html.contains("Alternate Flash Menus"));
    }

    #[test]
    fn test_detail_page_escapes_catalog_text() {
        let mut t = theme("a");
        t.name = "<script>alert('x')</script>".into();
        t.note = Some("<b>bold</b> & more".into());
        t.supported_models = vec!["K750i\"><img src=x>".into()];
        let html = render_theme_page(&t, &SiteConfig::default());
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("<title>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</title>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; &amp; more"));
        assert!(!html.contains("<img src=x>"));
    }

    #[test]
    fn test_run_generate_missing_catalog_fails() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            catalog: dir.path().join("themes.json"),
            ..config_in(dir.path())
        };
        assert!(run_generate(&config).is_err());
        assert!(!dir.path().join("index.html").exists());
    }

    #[test]
    fn test_run_generate_end_to_end() {
        let dir = TempDir::new().unwrap();
        let catalog = dir.path().join("themes.json");
        fs::write(&catalog, SAMPLE).unwrap();
        let config = SiteConfig {
            catalog,
            ..config_in(dir.path())
        };
        run_generate(&config).unwrap();

        let home = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(home.contains(r#"data-catalog="themes.json""#));
        assert!(dir.path().join("themes-pages/a.html").exists());
        assert!(dir.path().join("js/main.js").exists());
    }
}
