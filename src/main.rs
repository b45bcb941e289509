//! Headless form driver.
//!
//! Loads a schema from a URL or a local file, renders it into the
//! in-memory host, and drives the form from stdin. Useful for exercising a
//! schema end to end without a browser in front of the device.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use jsonform::{
    FormApp, FormTransport,
    client::HttpTransport,
    host::{
        UiEvent,
        memory::{MemoryHost, dispatch},
    },
    run::FileTransport,
};

#[derive(Parser, Debug)]
#[command(name = "jsonform", version, about = "Render and drive a JSON-schema form")]
struct Args {
    /// Schema location: an http(s) URL or a local JSON file.
    schema: String,

    /// Save target: an http(s) URL or a local file path.
    #[arg(long, default_value = "form-output.json")]
    save: String,

    /// HTTP basic auth username.
    #[arg(long, requires = "password")]
    username: Option<String>,

    /// HTTP basic auth password.
    #[arg(long, requires = "username")]
    password: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let transport: Box<dyn FormTransport> = if is_url(&args.schema) {
        let mut transport = HttpTransport::new(args.schema.clone(), args.save.clone());
        if let (Some(username), Some(password)) = (&args.username, &args.password) {
            transport = transport.with_basic_auth(username, password);
        }
        Box::new(transport)
    } else {
        Box::new(FileTransport::new(&args.schema, &args.save))
    };

    let mut host = MemoryHost::new();
    let mount = host.mount();
    let mut app = FormApp::new(transport, mount);
    app.load(&mut host)?;
    drain_notices(&mut host);

    print_fields(&host, &app);
    print_help();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let mut parts = line.trim().splitn(3, ' ');
        match (parts.next().unwrap_or(""), parts.next(), parts.next()) {
            ("show", _, _) => print_fields(&host, &app),
            ("toggle", Some(path), _) => {
                fire(&mut host, &mut app, path, UiEvent::Click);
            }
            ("set", Some(path), Some(value)) => {
                fire(&mut host, &mut app, path, UiEvent::Change(value.to_string()));
            }
            ("save", _, _) => {
                let outcome = app.save(&mut host);
                println!("save outcome: {outcome:?}");
            }
            ("reset", _, _) => {
                app.reset(&mut host)?;
                print_fields(&host, &app);
            }
            ("quit", _, _) | ("exit", _, _) => break,
            ("", _, _) => {}
            _ => print_help(),
        }
        drain_notices(&mut host);
    }
    Ok(())
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

fn fire(host: &mut MemoryHost, app: &mut FormApp, path: &str, event: UiEvent) {
    let Some(node) = host.find_by_attr("data-path", path) else {
        println!("no field at path {path:?}");
        return;
    };
    let Some(session) = app.session_mut() else {
        println!("no form loaded");
        return;
    };
    dispatch(host, session, node, event);
}

fn print_fields(host: &MemoryHost, app: &FormApp) {
    let Some(session) = app.session() else {
        println!("no form loaded");
        return;
    };
    println!("fields ({}):", session.registry().len());
    for (path, entry) in session.registry().iter() {
        let shown = if host.effectively_visible(entry.wrapper) {
            " "
        } else {
            "·"
        };
        let value = match &entry.value {
            jsonform::data::FieldValue::Bool(b) => b.to_string(),
            jsonform::data::FieldValue::Text(t) => format!("{t:?}"),
        };
        println!("  {shown} {path} = {value}");
    }
}

fn print_help() {
    println!("commands: show | toggle <path> | set <path> <value> | save | reset | quit");
    println!("(· marks fields currently hidden by visibility rules)");
}

fn drain_notices(host: &mut MemoryHost) {
    for notice in host.take_notices() {
        println!("! {notice}");
    }
}
