// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in bilingual content catalog.
//!
//! The raw bundles here are the single place where user-visible wording
//! lives. Media paths are resolved against the configured media directory;
//! a missing file downgrades the answer to text at send time.

use std::collections::HashMap;
use std::path::Path;

use concierge_core::types::actions;
use concierge_core::{CannedAnswer, ContentSource, MediaKind, MediaRef, RawBundle};

use crate::bundle::{labels, templates};

/// Compiled-in content source with Russian and English bundles.
pub struct StaticCatalog {
    bundles: HashMap<String, RawBundle>,
}

impl StaticCatalog {
    /// The full built-in catalog; `media_dir` anchors answer attachments.
    pub fn builtin(media_dir: impl AsRef<Path>) -> Self {
        let media_dir = media_dir.as_ref();
        let mut bundles = HashMap::new();
        for bundle in [ru_bundle(media_dir), en_bundle(media_dir)] {
            bundles.insert(bundle.tag.clone(), bundle);
        }
        Self { bundles }
    }
}

impl ContentSource for StaticCatalog {
    fn languages(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.bundles.keys().cloned().collect();
        tags.sort();
        tags
    }

    fn load(&self, tag: &str) -> Option<RawBundle> {
        self.bundles.get(tag).cloned()
    }
}

fn photo(media_dir: &Path, name: &str) -> Option<MediaRef> {
    Some(MediaRef {
        path: media_dir.join(name),
        kind: MediaKind::Photo,
    })
}

fn video(media_dir: &Path, name: &str) -> Option<MediaRef> {
    Some(MediaRef {
        path: media_dir.join(name),
        kind: MediaKind::Video,
    })
}

fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn ru_bundle(media_dir: &Path) -> RawBundle {
    let mut answers = HashMap::new();
    answers.insert(
        actions::MAIN_KEYS.to_string(),
        CannedAnswer {
            text: "1) Проверьте, что интернет работает без VPN.\n\
                   2) Если проблема остаётся, запросите новый ключ у поддержки."
                .to_string(),
            media: photo(media_dir, "faq1.png"),
        },
    );
    answers.insert(
        actions::MAIN_RENEW.to_string(),
        CannedAnswer {
            text: "Подписку можно продлить через менеджера или личный кабинет.\n\
                   Если у вас нет ссылки на оплату, напишите в поддержку — пришлём её."
                .to_string(),
            media: photo(media_dir, "faq2.png"),
        },
    );
    answers.insert(
        actions::MAIN_INVITE.to_string(),
        CannedAnswer {
            text: "Откройте главное меню бота и выберите «Пригласить друга».\n\
                   Скопируйте ссылку-приглашение и отправьте её человеку."
                .to_string(),
            media: photo(media_dir, "faq3.png"),
        },
    );

    let mut install_answers = HashMap::new();
    install_answers.insert(
        "install:ios".to_string(),
        CannedAnswer {
            text: "1) Откройте App Store и установите приложение.\n\
                   2) Запустите приложение и добавьте ключ из письма или чата.\n\
                   3) Включите VPN и подтвердите добавление конфигурации."
                .to_string(),
            media: video(media_dir, "install_ios.mp4"),
        },
    );
    install_answers.insert(
        "install:android".to_string(),
        CannedAnswer {
            text: "1) Установите приложение из Google Play.\n\
                   2) Импортируйте ключ и разрешите создание VPN.\n\
                   3) Включите VPN в приложении."
                .to_string(),
            media: video(media_dir, "install_android.mp4"),
        },
    );
    install_answers.insert(
        "install:windows".to_string(),
        CannedAnswer {
            text: "1) Установите приложение для Windows.\n\
                   2) Добавьте ключ через кнопку Import.\n\
                   3) Подключитесь и проверьте статус."
                .to_string(),
            media: video(media_dir, "install_windows.mp4"),
        },
    );
    install_answers.insert(
        "install:macos".to_string(),
        CannedAnswer {
            text: "1) Установите приложение для macOS.\n\
                   2) Импортируйте ключ и разрешите системное расширение, если нужно.\n\
                   3) Включите VPN и проверьте соединение."
                .to_string(),
            media: video(media_dir, "install_macos.mp4"),
        },
    );
    install_answers.insert(
        "install:linux".to_string(),
        CannedAnswer {
            text: "1) Установите клиент согласно вашей системе.\n\
                   2) Импортируйте ключ через CLI или GUI.\n\
                   3) Подключитесь и проверьте внешний IP."
                .to_string(),
            media: video(media_dir, "install_linux.mp4"),
        },
    );

    RawBundle {
        tag: "ru".to_string(),
        native_name: "Русский".to_string(),
        templates: map(&[
            (
                templates::GREETING,
                "Здравствуйте! Мы готовы ответить на любой ваш вопрос. Если вы не нашли его в меню, оставьте обращение — мы передадим его в поддержку.",
            ),
            (templates::CHOOSE_PLATFORM, "Выберите платформу:"),
            (
                templates::SUPPORT_PROMPT,
                "Опишите проблему одним сообщением — мы передадим её в поддержку.",
            ),
            (templates::SUPPORT_TEXT_ONLY, "Опишите проблему текстом."),
            (templates::SUPPORT_CANCELLED, "Запрос отменён."),
            (
                templates::SUPPORT_SUBMITTED,
                "Спасибо! Мы уже получили ваше обращение.",
            ),
            (
                templates::SUPPORT_RESOLVED,
                "Отлично! Если появятся вопросы — напишите нам в любое время.",
            ),
            (
                templates::SUPPORT_REMINDER,
                "Если нужна помощь, опишите проблему одним сообщением — мы передадим её в поддержку.",
            ),
            (templates::FALLBACK, "Пожалуйста, выберите пункт из меню."),
            (templates::ADMIN_ONLY, "Команда доступна только администратору."),
            (templates::STATS_TITLE, "Статистика за {days} дней:"),
            (templates::STATS_EVENTS, "События"),
            (templates::STATS_USERS, "Уникальные пользователи"),
            (templates::STATS_BY_EVENT, "По событиям:"),
            (templates::STATS_TOP_FAQ, "Топ FAQ:"),
            (templates::STATS_TOP_INSTALL, "Топ установки:"),
            (
                templates::STATS_FEEDBACK,
                "Отзывы: помогло {helpful}, не помогло {unhelpful}",
            ),
        ]),
        answers,
        install_answers,
        labels: map(&[
            (labels::MAIN_KEYS, "Не работает ни один из ключей"),
            (labels::MAIN_INSTALL, "Как установить приложение"),
            (labels::MAIN_RENEW, "Как продлить подписку"),
            (labels::MAIN_INVITE, "Как пригласить человека"),
            (labels::MAIN_SUPPORT, "Не нашли ответ на ваш вопрос"),
            (labels::INSTALL_IOS, "iOS"),
            (labels::INSTALL_ANDROID, "Android"),
            (labels::INSTALL_WINDOWS, "Windows"),
            (labels::INSTALL_MACOS, "macOS"),
            (labels::INSTALL_LINUX, "Linux"),
            (labels::INSTALL_BACK, "Назад"),
            (labels::INSTALL_SUPPORT, "Ответ мне не подходит"),
            (labels::SUPPORT_CANCEL, "Отмена"),
            (labels::SUPPORT_RESOLVED, "Задача решена"),
            (labels::ANSWER_HELPFUL, "Помогло"),
            (labels::ANSWER_UNHELPFUL, "Не помогло"),
            (labels::ANSWER_MAIN_MENU, "Главное меню"),
        ]),
        subject_labels: map(&[
            (actions::MAIN_KEYS, "Не работает ни один из ключей"),
            (actions::MAIN_RENEW, "Как продлить подписку"),
            (actions::MAIN_INVITE, "Как пригласить человека"),
            ("install:ios", "iOS"),
            ("install:android", "Android"),
            ("install:windows", "Windows"),
            ("install:macos", "macOS"),
            ("install:linux", "Linux"),
        ]),
        cancel_phrases: vec!["отмена".to_string()],
    }
}

fn en_bundle(media_dir: &Path) -> RawBundle {
    let mut answers = HashMap::new();
    answers.insert(
        actions::MAIN_KEYS.to_string(),
        CannedAnswer {
            text: "1) Check that your internet works without the VPN.\n\
                   2) If the problem persists, ask support for a fresh key."
                .to_string(),
            media: photo(media_dir, "faq1.png"),
        },
    );
    answers.insert(
        actions::MAIN_RENEW.to_string(),
        CannedAnswer {
            text: "You can renew through your manager or the account page.\n\
                   If you have no payment link, message support and we will send one."
                .to_string(),
            media: photo(media_dir, "faq2.png"),
        },
    );
    answers.insert(
        actions::MAIN_INVITE.to_string(),
        CannedAnswer {
            text: "Open the bot's main menu and pick \"Invite a friend\".\n\
                   Copy the invite link and send it over."
                .to_string(),
            media: photo(media_dir, "faq3.png"),
        },
    );

    let mut install_answers = HashMap::new();
    install_answers.insert(
        "install:ios".to_string(),
        CannedAnswer {
            text: "1) Open the App Store and install the app.\n\
                   2) Launch it and add the key from your email or chat.\n\
                   3) Enable the VPN and confirm the configuration prompt."
                .to_string(),
            media: video(media_dir, "install_ios.mp4"),
        },
    );
    install_answers.insert(
        "install:android".to_string(),
        CannedAnswer {
            text: "1) Install the app from Google Play.\n\
                   2) Import the key and allow VPN creation.\n\
                   3) Turn the VPN on inside the app."
                .to_string(),
            media: video(media_dir, "install_android.mp4"),
        },
    );
    install_answers.insert(
        "install:windows".to_string(),
        CannedAnswer {
            text: "1) Install the Windows app.\n\
                   2) Add the key via the Import button.\n\
                   3) Connect and check the status."
                .to_string(),
            media: video(media_dir, "install_windows.mp4"),
        },
    );
    install_answers.insert(
        "install:macos".to_string(),
        CannedAnswer {
            text: "1) Install the macOS app.\n\
                   2) Import the key and approve the system extension if asked.\n\
                   3) Enable the VPN and verify the connection."
                .to_string(),
            media: video(media_dir, "install_macos.mp4"),
        },
    );
    install_answers.insert(
        "install:linux".to_string(),
        CannedAnswer {
            text: "1) Install the client for your distribution.\n\
                   2) Import the key via CLI or GUI.\n\
                   3) Connect and verify your external IP."
                .to_string(),
            media: video(media_dir, "install_linux.mp4"),
        },
    );

    RawBundle {
        tag: "en".to_string(),
        native_name: "English".to_string(),
        templates: map(&[
            (
                templates::GREETING,
                "Hello! We are happy to answer any question. If the menu does not cover it, leave a request and we will pass it to support.",
            ),
            (templates::CHOOSE_PLATFORM, "Pick your platform:"),
            (
                templates::SUPPORT_PROMPT,
                "Describe the problem in one message and we will hand it to support.",
            ),
            (templates::SUPPORT_TEXT_ONLY, "Please describe the problem as text."),
            (templates::SUPPORT_CANCELLED, "Request cancelled."),
            (
                templates::SUPPORT_SUBMITTED,
                "Thanks! We have received your request.",
            ),
            (
                templates::SUPPORT_RESOLVED,
                "Great! If anything else comes up, write to us any time.",
            ),
            (
                templates::SUPPORT_REMINDER,
                "If you still need help, describe the problem in one message and we will hand it to support.",
            ),
            (templates::FALLBACK, "Please pick an item from the menu."),
            (
                templates::ADMIN_ONLY,
                "This command is available to the administrator only.",
            ),
            (templates::STATS_TITLE, "Statistics for the last {days} days:"),
            (templates::STATS_EVENTS, "Events"),
            (templates::STATS_USERS, "Unique users"),
            (templates::STATS_BY_EVENT, "By event:"),
            (templates::STATS_TOP_FAQ, "Top FAQ:"),
            (templates::STATS_TOP_INSTALL, "Top installs:"),
            (
                templates::STATS_FEEDBACK,
                "Feedback: helpful {helpful}, unhelpful {unhelpful}",
            ),
        ]),
        answers,
        install_answers,
        labels: map(&[
            (labels::MAIN_KEYS, "None of my keys work"),
            (labels::MAIN_INSTALL, "How to install the app"),
            (labels::MAIN_RENEW, "How to renew my subscription"),
            (labels::MAIN_INVITE, "How to invite someone"),
            (labels::MAIN_SUPPORT, "I did not find my answer"),
            (labels::INSTALL_IOS, "iOS"),
            (labels::INSTALL_ANDROID, "Android"),
            (labels::INSTALL_WINDOWS, "Windows"),
            (labels::INSTALL_MACOS, "macOS"),
            (labels::INSTALL_LINUX, "Linux"),
            (labels::INSTALL_BACK, "Back"),
            (labels::INSTALL_SUPPORT, "This answer does not help"),
            (labels::SUPPORT_CANCEL, "Cancel"),
            (labels::SUPPORT_RESOLVED, "Issue resolved"),
            (labels::ANSWER_HELPFUL, "Helpful"),
            (labels::ANSWER_UNHELPFUL, "Not helpful"),
            (labels::ANSWER_MAIN_MENU, "Main menu"),
        ]),
        subject_labels: map(&[
            (actions::MAIN_KEYS, "None of my keys work"),
            (actions::MAIN_RENEW, "How to renew my subscription"),
            (actions::MAIN_INVITE, "How to invite someone"),
            ("install:ios", "iOS"),
            ("install:android", "Android"),
            ("install:windows", "Windows"),
            ("install:macos", "macOS"),
            ("install:linux", "Linux"),
        ]),
        cancel_phrases: vec!["cancel".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_both_languages() {
        let catalog = StaticCatalog::builtin("media");
        assert_eq!(catalog.languages(), vec!["en", "ru"]);
    }

    #[test]
    fn bundles_cover_the_same_answer_keys() {
        let catalog = StaticCatalog::builtin("media");
        let ru = catalog.load("ru").unwrap();
        let en = catalog.load("en").unwrap();

        let mut ru_keys: Vec<_> = ru.answers.keys().collect();
        let mut en_keys: Vec<_> = en.answers.keys().collect();
        ru_keys.sort();
        en_keys.sort();
        assert_eq!(ru_keys, en_keys);

        assert_eq!(ru.install_answers.len(), en.install_answers.len());
    }

    #[test]
    fn media_paths_are_anchored_to_media_dir() {
        let catalog = StaticCatalog::builtin("/srv/concierge/media");
        let ru = catalog.load("ru").unwrap();
        let media = ru.answers[actions::MAIN_KEYS].media.as_ref().unwrap();
        assert!(media.path.starts_with("/srv/concierge/media"));
        assert_eq!(media.kind, MediaKind::Photo);
    }

    #[test]
    fn unknown_tag_loads_nothing() {
        let catalog = StaticCatalog::builtin("media");
        assert!(catalog.load("de").is_none());
    }

    #[test]
    fn each_bundle_declares_a_cancel_phrase() {
        let catalog = StaticCatalog::builtin("media");
        for tag in catalog.languages() {
            let raw = catalog.load(&tag).unwrap();
            assert!(!raw.cancel_phrases.is_empty(), "no cancel phrase for {tag}");
        }
    }
}
