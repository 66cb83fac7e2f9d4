use chrono::{DateTime, FixedOffset, Utc};

use super::{escape, header};
use crate::{
    error::FormError,
    models::greeting::{Field, GreetingEntry},
    rsvp::RsvpForm,
};

pub const MAIN_TITLE: &str = "DROP YOUR GREETING";
pub const SUBTITLE: &str = "RSVP AND GREETING";
pub const EMPTY_PLACEHOLDER: &str = "Jadilah yang pertama mengucapkan.";
pub const SUBMIT_LABEL: &str = "Kirim Ucapan";
pub const SUBMITTING_LABEL: &str = "Mengirim...";

/// Disables the button while the browser posts the form.
const DISABLE_ON_SUBMIT: &str = "var b=this.querySelector('button[type=submit]');\
b.disabled=true;b.textContent='Mengirim...'";

/// Everything the RSVP page body needs.
pub struct RsvpView<'a> {
    pub form: &'a RsvpForm,
    pub loading: bool,
    pub entries: &'a [GreetingEntry],
    pub form_error: Option<&'a FormError>,
    pub offset: FixedOffset,
}

/// Same shape as the `id-ID` locale: `17/10/2026, 14.05.33`.
pub fn format_timestamp(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%d/%m/%Y, %H.%M.%S")
        .to_string()
}

fn radio(value: bool, checked: bool, label: &str) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        r#"<label class="attendance__option">
      <input type="radio" name="present" value="{value}"{checked}>
      <span>{label}</span>
    </label>"#
    )
}

fn greeting_item(entry: &GreetingEntry, offset: FixedOffset) -> String {
    let attendance = if entry.present {
        "(Hadir)"
    } else {
        "(Tidak Hadir)"
    };
    format!(
        r#"<div class="greeting-item">
      <div class="greeting-item__head">
        <div class="greeting-item__avatar">{initial}</div>
        <span>{name}</span>
        <span class="greeting-item__attendance">{attendance}</span>
      </div>
      <p class="greeting-item__message">{message}</p>
      <div class="greeting-item__time">{time}</div>
    </div>"#,
        initial = escape(&entry.initial()),
        name = escape(&entry.name),
        message = escape(&entry.message),
        time = format_timestamp(entry.created_at, offset),
    )
}

fn greeting_list(entries: &[GreetingEntry], offset: FixedOffset) -> String {
    if entries.is_empty() {
        return format!(
            r#"<div class="greetings">
  <div class="greetings__empty">{EMPTY_PLACEHOLDER}</div>
</div>"#
        );
    }
    let items: String = entries.iter().map(|e| greeting_item(e, offset)).collect();
    format!(
        r#"<div class="greetings greetings--scroll">
    {items}
</div>"#
    )
}

pub fn render(view: &RsvpView<'_>) -> String {
    let header = header(MAIN_TITLE, SUBTITLE);
    let form = view.form;

    let form_error = view
        .form_error
        .map(|e| format!(r#"<p class="form-error">{}</p>"#, escape(&e.to_string())))
        .unwrap_or_default();

    let (disabled, button_label) = if view.loading {
        (" disabled", SUBMITTING_LABEL)
    } else {
        ("", SUBMIT_LABEL)
    };

    format!(
        r#"{header}
<div class="intro">
  <p>Konfirmasi kehadiranmu dan kirimkan ucapan serta doa terbaik untuk kedua mempelai di hari istimewa mereka melalui kolom di bawah ini</p>
</div>
<form method="post" action="/rsvp" class="rsvp-form" onsubmit="{DISABLE_ON_SUBMIT}">
  {form_error}
  <input type="text" name="name" placeholder="Nama" value="{name}" maxlength="{name_max}" required>
  <input type="text" name="phone" placeholder="Alamat / Kontak" value="{phone}" maxlength="{phone_max}" required>
  <textarea name="message" placeholder="Ucapan" maxlength="{message_max}" required>{message}</textarea>
  <div class="attendance">
    <p>Konfirmasi Kehadiran:</p>
    {yes}
    {no}
  </div>
  <button type="submit"{disabled}>{button_label}</button>
</form>
{list}"#,
        name = escape(&form.name),
        phone = escape(&form.phone),
        message = escape(&form.message),
        name_max = Field::Name.max_len(),
        phone_max = Field::Phone.max_len(),
        message_max = Field::Message.max_len(),
        yes = radio(true, form.present, "Iya, Saya akan datang"),
        no = radio(false, !form.present, "Maaf, Saya tidak bisa datang"),
        list = greeting_list(view.entries, view.offset),
    )
}
