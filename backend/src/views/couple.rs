use super::header;

pub const MAIN_TITLE: &str = "INFFOCUS: THE COUPLE";
pub const SUBTITLE: &str = "THEY ARE NOT JUST THE HEADLINE — THEY ARE THE WHOLE STORY";

const STORY: &str = "Their story began with a simple meeting and blossomed into something \
extraordinary — a bond built on love, trust, and shared dreams. They are not just the \
headline — they are the whole story. Today, Gugun and Mila step into the spotlight as \
partners in a lifetime journey that tells the best chapters ever written, where love \
speaks, joy sparkles, and together stays home.";

pub fn render() -> String {
    let header = header(MAIN_TITLE, SUBTITLE);
    format!(
        r#"{header}
<div class="portrait">
  <img src="/assets/prewed4.jpg" alt="Gugun and Mila" class="portrait__image">
</div>
<div class="couple-names">
  <h2><span>GUGUN</span> <span class="charm-regular">And</span> <span>MILA</span></h2>
</div>
<div class="story">
  <p>{STORY}</p>
</div>
<div class="colophon">Published by The Eternal Love of Gugun &amp; Mila</div>"#
    )
}
