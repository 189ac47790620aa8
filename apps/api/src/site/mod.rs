// Public site: home page aggregate, contact form, resume download.
// Read paths go through the Content Store only; nothing here writes except the contact form.

pub mod handlers;
pub mod home;
