//! Comment templates.

use minijinja::Environment;
use serde::Serialize;

use crate::comment::domain::CommentError;

pub(super) const COMMENT_TEMPLATE: &str = r"
:mag: *Information Gathering Results* :mag:

{% if notice %}
_{{ notice }}_

{% endif %}
{% if suggestion %}
:bulb: *Suggestion:*
{panel:title=Analysis Suggestion|borderStyle=solid|borderColor=#ccc|titleBGColor=#f0f0f0|bgColor=#fff}{{ suggestion }}{panel}

{% endif %}
{% for section in sections %}
*{{ section.title }}:*
{% for entry in section.entries %}
- *{{ entry.name }}:* {{ entry.value }}
{% endfor %}

{% endfor %}
{panel:title=System Information|borderStyle=dashed|borderColor=#ddd|titleBGColor=#f5f5f5|bgColor=#f9f9f9}This comment was automatically generated by the Ticket Lens information gathering pipeline.
Generated on: {{ generated_at }}{panel}
";

pub(super) const DIGEST_TEMPLATE: &str = r#"
*Information Gathering Summary*

I've analyzed ticket {{ ticket_id }}: "{{ summary }}" and gathered the following information:

*Key Themes:*
{% for theme in themes %}
- {{ theme }}
{% endfor %}

*Risk Assessment:* {{ risk }}
*Priority:* {{ priority }}
{% if technical_analysis %}

*Technical Analysis:*
{{ technical_analysis }}
{% endif %}
{% if business_impact %}

*Business Impact:*
{{ business_impact }}
{% endif %}
{% if requirements %}

*Requirements:*
{% for requirement in requirements %}
- {{ requirement }}
{% endfor %}
{% endif %}
{% if recommended_priority %}

*Recommended Priority:* {{ recommended_priority }}
{% endif %}
{% if components %}

*Recommended Components:*
{% for component in components %}
- {{ component }}
{% endfor %}
{% endif %}
{% if labels %}

*Recommended Labels:*
{% for label in labels %}
- {{ label }}
{% endfor %}
{% endif %}
{% if next_steps %}

*Next Steps:*
{{ next_steps }}
{% endif %}
{% if suggestion %}

*Suggestion:* {{ suggestion }}
{% endif %}

_{{ method_note }}_
"#;

/// Renders a template with block trimming enabled.
pub(super) fn render(
    name: &'static str,
    source: &str,
    context: impl Serialize,
) -> Result<String, CommentError> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment
        .render_str(source.trim_start_matches('\n'), context)
        .map_err(|err| CommentError::Render {
            template: name,
            reason: err.to_string(),
        })
}
