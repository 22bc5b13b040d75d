use crate::view::{ItemView, SectionView, View};
use std::fmt::Write as _;

/// Each placeholder is substituted once, in template order, so substituted
/// text is never scanned again.
pub fn render_page(view: &View, query: &str) -> String {
    let mut out = String::with_capacity(INDEX_HTML.len());
    let mut rest = INDEX_HTML;
    for (placeholder, value) in [("{{QUERY}}", escape(query)), ("{{SECTIONS}}", render_view(view))] {
        if let Some((head, tail)) = rest.split_once(placeholder) {
            out.push_str(head);
            out.push_str(&value);
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Markup for the sections container. Catalog text is untrusted and always
/// escaped.
pub fn render_view(view: &View) -> String {
    match view {
        View::LoadFailed { .. } => empty_state(
            "fas fa-exclamation-triangle",
            "Failed to load dailys",
            "Please check if dailys.json exists and is valid",
        ),
        View::NoResults { .. } => empty_state(
            "fas fa-search",
            "No dailys found",
            "Try adjusting your search terms",
        ),
        View::Sections { sections } => {
            let mut out = String::new();
            for section in sections {
                render_section(&mut out, section);
            }
            out
        }
    }
}

fn empty_state(icon: &str, title: &str, hint: &str) -> String {
    format!(
        r#"<div class="empty-state"><i class="{icon}"></i><h3>{title}</h3><p>{hint}</p></div>"#
    )
}

fn render_section(out: &mut String, section: &SectionView) {
    let _ = write!(
        out,
        r#"<section class="topic-section{open}" data-topic-id="{id}">
  <div class="section-title">
    <div>
      <h2><span class="section-icon"><i class="{icon}"></i></span>{name}<span class="section-checkmark{complete}">&#10003;</span><span class="section-progress">{done}/{total}</span></h2>
      <div class="section-description">{description}</div>
    </div>
    <span class="collapse-icon">&#9662;</span>
  </div>
  <div class="games-grid">
"#,
        open = if section.collapsed { "" } else { " open" },
        id = escape(&section.topic_id),
        icon = escape(&section.icon),
        name = escape(&section.name),
        complete = if section.complete { " checked" } else { "" },
        done = section.done,
        total = section.total,
        description = escape(&section.description),
    );
    for item in &section.items {
        render_item(out, item);
    }
    out.push_str("  </div>\n</section>\n");
}

fn render_item(out: &mut String, item: &ItemView) {
    let favicon = match &item.favicon {
        Some(src) => format!(r#"<img src="{}" alt="">"#, escape(src)),
        None => r#"<span class="favicon-fallback">&#9679;</span>"#.to_string(),
    };
    let _ = write!(
        out,
        r#"    <div class="game-card{checked}" data-game-id="{id}">
      <div class="game-info"><span class="game-favicon">{favicon}</span><span class="game-title">{name}</span></div>
      <a class="game-link" href="{url}" target="_blank" rel="noopener">Play Now &#8599;</a>
    </div>
"#,
        checked = if item.checked { " checked" } else { "" },
        id = escape(&item.id),
        name = escape(&item.name),
        url = escape(&item.url),
    );
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Dailys</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --text-secondary: #8b857d;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      display: grid;
      gap: 20px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .search-bar {
      width: 100%;
      padding: 14px 18px;
      border-radius: 999px;
      border: 1px solid rgba(47, 72, 88, 0.15);
      font-size: 1rem;
    }

    .topic-section {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 18px 22px;
    }

    .section-title {
      display: flex;
      justify-content: space-between;
      align-items: center;
      cursor: pointer;
    }

    .section-title h2 {
      margin: 0;
      display: flex;
      align-items: center;
      gap: 10px;
      font-size: 1.2rem;
    }

    .section-description {
      color: var(--text-secondary);
      font-size: 0.9rem;
    }

    .section-checkmark {
      visibility: hidden;
      color: #2d7a4b;
    }

    .section-checkmark.checked {
      visibility: visible;
    }

    .section-progress {
      font-size: 0.85rem;
      color: var(--text-secondary);
    }

    .games-grid {
      display: none;
      grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
      gap: 12px;
      margin-top: 14px;
    }

    .topic-section.open .games-grid {
      display: grid;
    }

    .topic-section.open .collapse-icon {
      transform: rotate(180deg);
    }

    .game-card {
      background: white;
      border-radius: 14px;
      padding: 14px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 10px;
      cursor: pointer;
    }

    .game-card.checked {
      opacity: 0.7;
    }

    .game-card.checked .game-title {
      text-decoration: line-through;
      color: var(--text-secondary);
    }

    .game-info {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .game-favicon img {
      width: 18px;
      height: 18px;
    }

    .game-link {
      color: var(--accent);
      font-weight: 600;
      text-decoration: none;
    }

    .empty-state {
      text-align: center;
      color: var(--accent-2);
      padding: 40px 0;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Dailys</h1>
    </header>
    <input class="search-bar" type="search" placeholder="Search dailys..." value="{{QUERY}}" autocomplete="off" />
    <div id="gamesContainer">
{{SECTIONS}}
    </div>
  </main>

  <script>
    const container = document.getElementById('gamesContainer');
    const searchBar = document.querySelector('.search-bar');
    let searchSeq = 0;

    const loadSections = async (query) => {
      const seq = ++searchSeq;
      const res = await fetch('/sections?q=' + encodeURIComponent(query));
      if (!res.ok || seq !== searchSeq) {
        return;
      }
      container.innerHTML = await res.text();
    };

    const byData = (attr, id) =>
      Array.from(container.querySelectorAll('[' + attr + ']')).find((el) => el.getAttribute(attr) === id);

    const applyPatch = (patch) => {
      if (patch.kind === 'item_checked') {
        const card = byData('data-game-id', patch.item_id);
        if (card) card.classList.toggle('checked', patch.checked);
      } else if (patch.kind === 'topic_complete') {
        const section = byData('data-topic-id', patch.topic_id);
        const mark = section && section.querySelector('.section-checkmark');
        if (mark) mark.classList.toggle('checked', patch.complete);
      } else if (patch.kind === 'section_collapsed') {
        const section = byData('data-topic-id', patch.topic_id);
        if (section) section.classList.toggle('open', !patch.collapsed);
      } else if (patch.kind === 'progress') {
        const section = byData('data-topic-id', patch.topic_id);
        const progress = section && section.querySelector('.section-progress');
        if (progress) progress.textContent = patch.done + '/' + patch.total;
      }
    };

    const toggleItem = async (id) => {
      const res = await fetch('/api/items/' + encodeURIComponent(id) + '/toggle', { method: 'POST' });
      if (!res.ok) {
        return;
      }
      const body = await res.json();
      if (body.reconciliation.mode === 'patch') {
        body.reconciliation.patches.forEach(applyPatch);
      } else {
        await loadSections(searchBar.value);
      }
    };

    const toggleSection = async (section) => {
      const id = section.getAttribute('data-topic-id');
      const res = await fetch('/api/topics/' + encodeURIComponent(id) + '/collapse', { method: 'POST' });
      if (!res.ok) {
        return;
      }
      const body = await res.json();
      section.classList.toggle('open', !body.collapsed);
      if (!body.collapsed) {
        section.scrollIntoView({ behavior: 'smooth', block: 'start' });
      }
    };

    container.addEventListener('click', (event) => {
      if (event.target.closest('.game-link')) {
        return;
      }
      const card = event.target.closest('.game-card');
      if (card) {
        toggleItem(card.getAttribute('data-game-id'));
        return;
      }
      const title = event.target.closest('.section-title');
      if (title) {
        toggleSection(title.closest('.topic-section'));
      }
    });

    searchBar.addEventListener('input', (event) => {
      loadSections(event.target.value);
    });

    searchBar.addEventListener('keydown', (event) => {
      if (event.key === 'Escape') {
        searchBar.value = '';
        loadSections('');
      }
    });
  </script>
</body>
</html>
"#;
