// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of the platform-neutral keyboard onto Telegram inline markup.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use vigil_core::Keyboard;

/// Convert a [`Keyboard`] into Telegram inline markup. Every button becomes
/// a callback button carrying its action string as callback data.
pub fn to_inline_keyboard(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.buttons.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.action.clone())
            })
            .collect::<Vec<_>>()
    }))
}
