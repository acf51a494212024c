use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
use wp_client::{
    Config, Media, Menu, MenuItem, Post, SiteSettings, Theme, User, WpClient, WpClientError,
};

#[derive(Debug, Parser)]
#[command(
    name = "wp-cli",
    version,
    about = "CLI для администрирования WordPress с генерацией статей через Gemini"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Список установленных тем.
    Themes,
    /// Активация темы по slug.
    ActivateTheme {
        #[arg(long)]
        slug: String,
    },
    /// Замена пунктов меню.
    ///
    /// Каждый пункт передаётся как `--item "Заголовок=/url"`.
    UpdateMenu {
        #[arg(long)]
        id: i64,
        #[arg(long = "item", value_name = "ЗАГОЛОВОК=URL", required = true)]
        items: Vec<String>,
    },
    /// Создание записи или страницы.
    CreatePost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// Идентификаторы рубрик через запятую.
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<i64>>,
        /// Идентификатор обложки из медиабиблиотеки.
        #[arg(long)]
        featured_media: Option<i64>,
        #[arg(long, default_value = "publish")]
        status: String,
        #[arg(long = "type", default_value = "post")]
        post_type: String,
    },
    /// Обновление записи: меняются только переданные поля.
    UpdatePost {
        #[arg(long)]
        id: i64,
        #[arg(long = "type", default_value = "post")]
        post_type: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<i64>>,
        #[arg(long)]
        featured_media: Option<i64>,
    },
    /// Удаление записи (WordPress переносит её в корзину).
    DeletePost {
        #[arg(long)]
        id: i64,
        #[arg(long = "type", default_value = "post")]
        post_type: String,
    },
    /// Загрузка файла в медиабиблиотеку.
    UploadMedia {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "")]
        alt: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Создание пользователя.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: String,
    },
    /// Обновление почты и роли пользователя.
    UpdateUser {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Удаление пользователя.
    DeleteUser {
        #[arg(long)]
        id: i64,
        /// Передать контент пользователю с этим id.
        #[arg(long)]
        reassign: Option<i64>,
    },
    /// Создание файла-заглушки резервной копии.
    Backup {
        #[arg(long, default_value = "backups")]
        dir: PathBuf,
    },
    /// Генерация статьи через Gemini.
    Generate {
        #[arg(long)]
        topic: String,
        /// Объём: short, medium или long.
        #[arg(long, default_value = "medium")]
        length: String,
        /// Сразу сохранить статью черновиком.
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let cli = Cli::parse();

    let config = Config::from_env().map_err(map_client_error)?;
    let client = WpClient::connect(&config).await.map_err(map_client_error)?;

    match cli.command {
        Command::Themes => {
            let themes = client.list_themes().await.map_err(map_client_error)?;
            print_themes(&themes);
        }
        Command::ActivateTheme { slug } => {
            let settings = client
                .activate_theme(&slug)
                .await
                .map_err(map_client_error)?;
            print_settings(&format!("Тема '{slug}' активирована"), &settings)?;
        }
        Command::UpdateMenu { id, items } => {
            let items = parse_menu_items(&items)?;
            let menu = client
                .update_menu(id, &items)
                .await
                .map_err(map_client_error)?;
            print_menu("Меню обновлено", &menu)?;
        }
        Command::CreatePost {
            title,
            content,
            categories,
            featured_media,
            status,
            post_type,
        } => {
            let post = client
                .create_post(
                    &title,
                    &content,
                    categories.as_deref(),
                    featured_media,
                    &status,
                    &post_type,
                )
                .await
                .map_err(map_client_error)?;
            print_post("Запись создана", &post);
        }
        Command::UpdatePost {
            id,
            post_type,
            title,
            content,
            categories,
            featured_media,
        } => {
            let post = client
                .update_post(
                    id,
                    &post_type,
                    title.as_deref(),
                    content.as_deref(),
                    categories.as_deref(),
                    featured_media,
                )
                .await
                .map_err(map_client_error)?;
            print_post("Запись обновлена", &post);
        }
        Command::DeletePost { id, post_type } => {
            let post = client
                .delete_post(id, &post_type)
                .await
                .map_err(map_client_error)?;
            print_post("Запись удалена", &post);
        }
        Command::UploadMedia {
            file,
            alt,
            description,
        } => {
            let media = client
                .upload_media(&file, &alt, &description)
                .await
                .map_err(map_client_error)?;
            print_media("Файл загружен", &media);
        }
        Command::CreateUser {
            username,
            email,
            password,
            role,
        } => {
            let user = client
                .create_user(&username, &email, &password, &role)
                .await
                .map_err(map_client_error)?;
            print_user("Пользователь создан", &user);
        }
        Command::UpdateUser { id, email, role } => {
            let user = client
                .update_user(id, email.as_deref(), role.as_deref())
                .await
                .map_err(map_client_error)?;
            print_user("Пользователь обновлён", &user);
        }
        Command::DeleteUser { id, reassign } => {
            let deleted = client
                .delete_user(id, reassign)
                .await
                .map_err(map_client_error)?;
            if deleted.deleted {
                println!(
                    "Пользователь удалён: {} (id={id})",
                    deleted.previous.username
                );
            } else {
                println!("Сайт не подтвердил удаление пользователя id={id}");
            }
        }
        Command::Backup { dir } => {
            let path = client.backup_site(&dir).await.map_err(map_client_error)?;
            println!("Резервная копия создана: {}", path.display());
        }
        Command::Generate {
            topic,
            length,
            save,
        } => {
            let article = client
                .generate_article(&topic, &length)
                .await
                .map_err(map_client_error)?;
            if save {
                let post = client
                    .create_post(&article.title, &article.content, None, None, "draft", "post")
                    .await
                    .map_err(map_client_error)?;
                print_post("Черновик сохранён", &post);
            } else {
                println!("# {}", article.title);
                println!();
                println!("{}", article.content);
            }
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let default_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("failed to init logging: {err}"))?;

    Ok(())
}

fn parse_menu_items(raw: &[String]) -> Result<Vec<MenuItem>> {
    raw.iter()
        .map(|item| {
            let (title, url) = item.split_once('=').ok_or_else(|| {
                anyhow!("пункт меню задаётся как 'Заголовок=URL', получено: {item}")
            })?;

            let title = title.trim();
            let url = url.trim();
            if title.is_empty() || url.is_empty() {
                return Err(anyhow!(
                    "в пункте меню пустой заголовок или URL: {item}"
                ));
            }

            Ok(MenuItem {
                title: title.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

fn map_client_error(err: WpClientError) -> anyhow::Error {
    let message = match err {
        WpClientError::Config(message) => {
            format!("некорректная конфигурация: {message}")
        }
        WpClientError::Auth(message) => format!("не удалось авторизоваться: {message}"),
        WpClientError::Http(err) => format!("ошибка HTTP: {err}"),
        WpClientError::Remote { status, message } => {
            format!("сайт ответил {status}: {message}")
        }
        WpClientError::Gemini(message) => format!("ошибка Gemini: {message}"),
        WpClientError::File(err) => format!("ошибка доступа к файлу: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_themes(themes: &[Theme]) {
    println!("Тем установлено: {}", themes.len());
    for theme in themes {
        let mark = if theme.status == "active" { "*" } else { " " };
        println!(
            "{mark} {} {} ({})",
            theme.stylesheet, theme.version, theme.name.rendered
        );
    }
}

// Настройки и меню печатаются целиком: их форма зависит от плагинов сайта.
fn print_settings(title: &str, settings: &SiteSettings) -> Result<()> {
    println!("{title}");
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

fn print_menu(title: &str, menu: &Menu) -> Result<()> {
    println!("{title}");
    println!("{}", serde_json::to_string_pretty(menu)?);
    Ok(())
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("type: {}", post.post_type);
    println!("status: {}", post.status);
    println!("title: {}", post.title.rendered);
    println!("link: {}", post.link);
    if let Some(date) = post.date {
        println!("date: {date}");
    }
}

fn print_media(title: &str, media: &Media) {
    println!("{title}");
    println!("id: {}", media.id);
    println!("url: {}", media.source_url);
    println!("mime: {}", media.mime_type);
}

fn print_user(title: &str, user: &User) {
    println!("{title}");
    println!("id: {}", user.id);
    println!("username: {}", user.username);
    println!("email: {}", user.email);
    println!("roles: {}", user.roles.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_menu_items_reads_title_url_pairs() {
        let raw = vec![" Главная = / ".to_string(), "О нас=/about".to_string()];

        let items = parse_menu_items(&raw).expect("items must parse");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Главная");
        assert_eq!(items[0].url, "/");
        assert_eq!(items[1].title, "О нас");
        assert_eq!(items[1].url, "/about");
    }

    #[test]
    fn parse_menu_items_rejects_missing_separator() {
        let raw = vec!["Главная".to_string()];
        assert!(parse_menu_items(&raw).is_err());
    }

    #[test]
    fn parse_menu_items_rejects_blank_parts() {
        let raw = vec!["=/about".to_string()];
        assert!(parse_menu_items(&raw).is_err());

        let raw = vec!["О нас=  ".to_string()];
        assert!(parse_menu_items(&raw).is_err());
    }
}
