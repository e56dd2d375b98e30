//! HTML report with the staggered bar chart

use crate::render::{EmotionBar, RenderedResult};
use crate::selection::Preview;
use chrono::Local;
use std::io::{self, Write};

pub fn write<W: Write>(
    writer: &mut W,
    preview: Option<&Preview>,
    result: &RenderedResult,
) -> io::Result<()> {
    let preview_html = match preview {
        Some(p) => format!(
            r#"<img class="preview" src="{}" alt="{}">
            <div class="dim">{}</div>"#,
            html_escape(&p.data_uri),
            html_escape(&p.file_name),
            html_escape(&p.file_name)
        ),
        None => String::new(),
    };

    let bars_html: Vec<String> = result.bars.iter().map(bar_html).collect();

    // Write the full HTML document
    write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Emotion Detection Result</title>
    <style>
        :root {{
            --bg: #0d1117;
            --card: #161b22;
            --border: #30363d;
            --text: #e6edf3;
            --dim: #7d8590;
            --accent: #6366f1;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            line-height: 1.5;
        }}
        .container {{ max-width: 720px; margin: 0 auto; padding: 2rem; }}
        .card {{
            background: var(--card);
            border: 1px solid var(--border);
            border-radius: 12px;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
        }}
        .dim {{ color: var(--dim); font-size: 0.875rem; }}
        .preview {{ display: block; max-width: 100%; max-height: 360px; margin: 0 auto 0.5rem; border-radius: 8px; }}

        /* Dominant emotion */
        .dominant {{ display: flex; align-items: center; gap: 1rem; }}
        .emotion-icon {{ font-size: 3rem; }}
        .dominant-text {{ font-size: 1.75rem; font-weight: 700; }}
        .dominant-confidence {{ font-size: 1.25rem; color: var(--accent); margin-left: auto; }}

        /* Bars */
        .emotion-bar {{ margin-bottom: 0.75rem; }}
        .emotion-label {{ margin-bottom: 0.25rem; }}
        .bar-container {{ background: var(--border); border-radius: 999px; height: 1.5rem; overflow: hidden; }}
        .bar-fill {{
            width: 0%;
            height: 100%;
            border-radius: 999px;
            display: flex;
            align-items: center;
            justify-content: flex-end;
            animation: bar-grow 0.8s ease forwards;
        }}
        .bar-percentage {{ font-size: 0.75rem; font-weight: 600; padding: 0 0.5rem; color: #fff; }}
        @keyframes bar-grow {{ to {{ width: var(--target); }} }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            {preview_html}
        </div>
        <div class="card dominant" id="dominantEmotion">
            <span class="emotion-icon">{glyph}</span>
            <span class="dominant-text" id="dominantEmotionText">{label}</span>
            <span class="dominant-confidence" id="dominantConfidence">{confidence}</span>
        </div>
        <div class="card" id="emotionsChart">
{bars}
        </div>
        <div class="dim">Generated {generated}</div>
    </div>
</body>
</html>
"#,
        preview_html = preview_html,
        glyph = result.dominant.glyph,
        label = html_escape(&result.dominant.label),
        confidence = html_escape(&result.dominant.confidence_text),
        bars = bars_html.join("\n"),
        generated = Local::now().format("%Y-%m-%d %H:%M:%S"),
    )?;

    Ok(())
}

/// Each fill starts at zero width and grows to its percentage once its
/// rank's delay has passed.
fn bar_html(bar: &EmotionBar) -> String {
    format!(
        r#"            <div class="emotion-bar">
                <div class="emotion-label">{glyph} {label}</div>
                <div class="bar-container">
                    <div class="bar-fill" style="--target: {width}%; background: {gradient}; animation-delay: {delay}ms;">
                        <span class="bar-percentage">{text}</span>
                    </div>
                </div>
            </div>"#,
        glyph = bar.glyph,
        label = html_escape(&bar.label),
        width = bar.percentage,
        gradient = bar.gradient,
        delay = bar.reveal_delay.as_millis(),
        text = html_escape(&bar.percentage_text),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
