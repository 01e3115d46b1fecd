//! Home page filter engine.
//!
//! `apply_filters` and the card renderer are the reference for what the
//! browser script in `client_script()` does on every filter change.

use crate::classify::{classify, meta_lines, TypePrecedence};
use crate::html::{asset_href, badge, html_escape, page_link};
use crate::types::{Theme, ThemeType};

/// Sentinel select value meaning "no constraint"
pub const ALL: &str = "all";

pub const NO_RESULTS_HTML: &str =
    r#"<p class="no-results">No themes match your search/filters.</p>"#;
pub const NO_THEMES_HTML: &str = r#"<p class="no-results">No themes to show.</p>"#;
pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load the theme catalog. Are you running a local server?";

/// Current value of every home page filter control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub model: String,
    pub platform: String,
    pub resolution: String,
    pub theme_type: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            model: ALL.to_string(),
            platform: ALL.to_string(),
            resolution: ALL.to_string(),
            theme_type: ALL.to_string(),
        }
    }
}

fn is_any(value: &str) -> bool {
    value.is_empty() || value == ALL
}

/// Lowercased text the search box is matched against
fn search_haystack(theme: &Theme) -> String {
    let models: Vec<&str> = theme.models().collect();
    [
        theme.name.as_str(),
        &models.join(" "),
        theme.author().unwrap_or(""),
        &theme.original_model.joined(" "),
        theme.carrier().unwrap_or(""),
        &theme.platform.joined(" "),
        theme.resolution.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

impl FilterState {
    pub fn matches(&self, theme: &Theme, precedence: TypePrecedence) -> bool {
        let query = self.search.trim().to_lowercase();
        if !query.is_empty() && !search_haystack(theme).contains(&query) {
            return false;
        }
        if !is_any(&self.model) && !theme.models().any(|m| m == self.model) {
            return false;
        }
        if !is_any(&self.platform) && !theme.platform.contains(&self.platform) {
            return false;
        }
        if !is_any(&self.resolution) && theme.resolution != self.resolution {
            return false;
        }
        if !is_any(&self.theme_type)
            && ThemeType::from_str(&self.theme_type) != Some(classify(theme, precedence))
        {
            return false;
        }
        true
    }
}

/// Themes passing every active filter, in catalog order
pub fn apply_filters<'a>(
    catalog: &'a [Theme],
    state: &FilterState,
    precedence: TypePrecedence,
) -> Vec<&'a Theme> {
    catalog
        .iter()
        .filter(|theme| state.matches(theme, precedence))
        .collect()
}

/// Summary card linking to the theme's detail page
pub fn render_card(theme: &Theme, pages_dir: &str, precedence: TypePrecedence) -> String {
    let name = html_escape(&theme.name);

    let image_html = theme
        .preview()
        .map(|src| format!(r#"<img src="{}" alt="{} Preview">"#, asset_href("", src), name))
        .unwrap_or_default();

    let meta_html: String = meta_lines(theme)
        .iter()
        .map(|line| {
            format!(
                r#"<p class="meta"><strong>{}:</strong> {}</p>"#,
                line.label,
                html_escape(&line.value)
            )
        })
        .collect();

    let models: Vec<&str> = theme.models().collect();
    let model_badge = if models.len() > 1 {
        "Multi-model"
    } else {
        models.first().copied().unwrap_or("")
    };

    let theme_type = classify(theme, precedence);
    let mut badges = vec![
        badge("model", model_badge),
        badge("platform", &theme.platform.joined(", ")),
        badge("resolution", &theme.resolution),
    ];
    if let Some(home_type) = theme.home_type() {
        badges.push(badge("home-type", home_type));
    }
    badges.push(badge(&format!("type-{}", theme_type.as_str()), theme_type.label()));

    format!(
        r#"<div class="theme-card">
    <a href="{}">
        {}
        <div class="card-body">
            <div class="card-top">
                <h3>{}</h3>
                {}
            </div>
            <div class="card-bottom">
                <div class="badges">{}</div>
            </div>
        </div>
    </a>
</div>"#,
        html_escape(&page_link(pages_dir, &theme.id)),
        image_html,
        name,
        meta_html,
        badges.join("")
    )
}

/// Contents of the theme list container: one card per visible theme, or
/// the no-results placeholder when nothing passes
pub fn render_theme_list(
    catalog: &[Theme],
    state: &FilterState,
    pages_dir: &str,
    precedence: TypePrecedence,
) -> String {
    let visible = apply_filters(catalog, state, precedence);
    if visible.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }
    visible
        .iter()
        .map(|theme| render_card(theme, pages_dir, precedence))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error banner plus empty list shown when the catalog cannot be loaded
pub fn render_load_failure() -> String {
    format!(
        r#"<div class="error-box" id="errorBox" style="display:block">⚠️ {}</div>
<section class="themes" id="themeList">{}</section>"#,
        html_escape(LOAD_FAILED_MESSAGE),
        NO_THEMES_HTML
    )
}

const CLIENT_SCRIPT: &str = r#"// js/main.js - generated by themes-site, do not edit
document.addEventListener('DOMContentLoaded', () => {
  const body = document.body;
  const precedence = body.dataset.typePrecedence || 'author-first';
  const pagesDir = body.dataset.pagesDir || 'themes-pages';
  const catalogUrl = body.dataset.catalog || 'themes.json';

  const modelFilter = document.getElementById('modelFilter');
  const platformFilter = document.getElementById('platformFilter');
  const resolutionFilter = document.getElementById('resolutionFilter');
  const typeFilter = document.getElementById('typeFilter');
  const searchInput = document.getElementById('searchInput');
  const themeList = document.getElementById('themeList');
  const errorBox = document.getElementById('errorBox');
  const pickerButtons = document.querySelectorAll('.model-picker [data-model]');

  const NO_RESULTS = '__NO_RESULTS__';
  const NO_THEMES = '__NO_THEMES__';
  const LOAD_FAILED = '__LOAD_FAILED__';
  const TYPE_LABELS = { user: 'User-made', carrier: 'Carrier', preloaded: 'Preloaded' };

  let themes = [];

  function escapeHtml(str) {
    if (!str) return '';
    return String(str).replace(/[&<>"']/g, c => ({
      '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
    }[c]));
  }

  function pageStem(id) {
    return String(id ?? '').replace(/%/g, '%25').replace(/\//g, '%2F').replace(/\\/g, '%5C');
  }

  function values(v) {
    if (Array.isArray(v)) return v.filter(Boolean);
    return v ? [v] : [];
  }

  function showError(msg) {
    errorBox.textContent = '⚠️ ' + msg;
    errorBox.style.display = 'block';
  }

  function themeType(theme) {
    const rules = precedence === 'carrier-first'
      ? [[theme.carrier, 'carrier'], [theme.author, 'user']]
      : [[theme.author, 'user'], [theme.carrier, 'carrier']];
    const hit = rules.find(([field]) => !!field);
    return hit ? hit[1] : 'preloaded';
  }

  function metaLines(theme) {
    if (theme.author) return [['Author', theme.author]];
    const lines = [['Preloaded on', values(theme.originalModel).join(', ')]];
    if (theme.carrier) lines.push(['Carrier', theme.carrier]);
    return lines;
  }

  function isAny(v) {
    return v === 'all' || v === '';
  }

  function matches(theme, state) {
    const models = values(theme.supportedModels);
    const platforms = values(theme.platform);
    const resolution = theme.resolution || '';
    if (state.search !== '') {
      const haystack = [
        theme.name || '',
        models.join(' '),
        theme.author || '',
        values(theme.originalModel).join(' '),
        theme.carrier || '',
        platforms.join(' '),
        resolution
      ].join(' ').toLowerCase();
      if (!haystack.includes(state.search)) return false;
    }
    if (!isAny(state.model) && !models.includes(state.model)) return false;
    if (!isAny(state.platform) && !platforms.includes(state.platform)) return false;
    if (!isAny(state.resolution) && resolution !== state.resolution) return false;
    if (!isAny(state.type) && themeType(theme) !== state.type) return false;
    return true;
  }

  function populateFilters() {
    const models = new Set();
    const platforms = new Set();
    const resolutions = new Set();

    themes.forEach(theme => {
      values(theme.supportedModels).forEach(m => models.add(m));
      values(theme.platform).forEach(p => platforms.add(p));
      if (theme.resolution) resolutions.add(theme.resolution);
    });

    function fill(selectEl, items) {
      const current = selectEl.value;
      while (selectEl.options.length > 1) selectEl.remove(1);
      [...items].sort().forEach(it => {
        const opt = document.createElement('option');
        opt.value = it;
        opt.textContent = it;
        selectEl.appendChild(opt);
      });
      if (items.has(current)) selectEl.value = current;
    }

    fill(modelFilter, models);
    fill(platformFilter, platforms);
    fill(resolutionFilter, resolutions);
  }

  function badge(cls, text) {
    return `<span class="badge ${cls}">${escapeHtml(text)}</span>`;
  }

  function cardHtml(theme) {
    const models = values(theme.supportedModels);
    const name = escapeHtml(theme.name);
    const preview = values(theme.screenshots)[0];
    const link = pagesDir + '/' + encodeURIComponent(pageStem(theme.id)) + '.html';
    const type = themeType(theme);
    const meta = metaLines(theme)
      .map(([label, value]) => `<p class="meta"><strong>${label}:</strong> ${escapeHtml(value)}</p>`)
      .join('');
    const badges = [
      badge('model', models.length > 1 ? 'Multi-model' : (models[0] || '')),
      badge('platform', values(theme.platform).join(', ')),
      badge('resolution', theme.resolution),
      theme.homeType ? badge('home-type', theme.homeType) : '',
      badge('type-' + type, TYPE_LABELS[type])
    ].join('');

    return `<div class="theme-card">
    <a href="${escapeHtml(link)}">
        ${preview ? `<img src="${escapeHtml(preview)}" alt="${name} Preview">` : ''}
        <div class="card-body">
            <div class="card-top">
                <h3>${name}</h3>
                ${meta}
            </div>
            <div class="card-bottom">
                <div class="badges">${badges}</div>
            </div>
        </div>
    </a>
</div>`;
  }

  function currentState() {
    return {
      search: (searchInput.value || '').trim().toLowerCase(),
      model: modelFilter.value,
      platform: platformFilter.value,
      resolution: resolutionFilter.value,
      type: typeFilter ? typeFilter.value : 'all'
    };
  }

  function render() {
    const state = currentState();
    const visible = themes.filter(theme => matches(theme, state));
    themeList.innerHTML = visible.length === 0 ? NO_RESULTS : visible.map(cardHtml).join('\n');
    pickerButtons.forEach(btn => {
      btn.classList.toggle('active', btn.dataset.model === state.model);
    });
  }

  async function init() {
    try {
      const res = await fetch(catalogUrl);
      if (!res.ok) throw new Error('HTTP ' + res.status);
      const data = await res.json();
      if (!Array.isArray(data)) throw new Error('catalog does not contain an array');
      themes = data;
      populateFilters();
      render();
    } catch (err) {
      console.error(err);
      showError(LOAD_FAILED);
      themeList.innerHTML = NO_THEMES;
    }
  }

  [modelFilter, platformFilter, resolutionFilter, typeFilter]
    .filter(Boolean)
    .forEach(el => el.addEventListener('change', render));
  searchInput.addEventListener('input', render);
  pickerButtons.forEach(btn => {
    btn.addEventListener('click', () => {
      modelFilter.value = modelFilter.value === btn.dataset.model ? 'all' : btn.dataset.model;
      render();
    });
  });

  init();
});
"#;

/// Browser rendition of the filter engine, written to `js/main.js`
pub fn client_script() -> String {
    CLIENT_SCRIPT
        .replace("__NO_RESULTS__", NO_RESULTS_HTML)
        .replace("__NO_THEMES__", NO_THEMES_HTML)
        .replace("__LOAD_FAILED__", LOAD_FAILED_MESSAGE)
}
