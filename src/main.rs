//! Case Conf entry point
//!
//! On the web, binds the student form, list and buttons of the page to the
//! repository. On native, a small CLI over a data directory.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Blob, BlobPropertyBag, Document, Element, Event, FileReader, HtmlAnchorElement,
        HtmlInputElement, HtmlTextAreaElement, ScrollBehavior, ScrollToOptions, Url, Window,
    };

    use case_conf::consts::EXPORT_FILE_NAME;
    use case_conf::platform::{LocalStorage, UnavailableStorage};
    use case_conf::report::escape_html;
    use case_conf::{KeyValueStorage, RecordError, RecordRepository, RecordStore, StudentRecord};

    /// Form field ids, in record order
    const FORM_FIELDS: [&str; 7] = [
        "studentId", "name", "dob", "center", "teacher", "goals", "progress",
    ];

    struct App {
        repo: RecordRepository<Box<dyn KeyValueStorage>>,
        window: Window,
        document: Document,
    }

    impl App {
        fn alert(&self, message: &str) {
            let _ = self.window.alert_with_message(message);
        }

        /// Value of an `<input>` or `<textarea>` by id
        fn field(&self, id: &str) -> String {
            let Some(el) = self.document.get_element_by_id(id) else {
                return String::new();
            };
            if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                input.value()
            } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
                area.value()
            } else {
                String::new()
            }
        }

        fn set_field(&self, id: &str, value: &str) {
            let Some(el) = self.document.get_element_by_id(id) else {
                return;
            };
            if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
                input.set_value(value);
            } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
                area.set_value(value);
            }
        }

        fn search_query(&self) -> String {
            self.field("search")
        }

        fn clear_form(&self) {
            for id in FORM_FIELDS {
                self.set_field(id, "");
            }
        }

        fn fill_form(&self, s: &StudentRecord) {
            let values = [
                &s.id, &s.name, &s.dob, &s.center, &s.teacher, &s.goals, &s.progress,
            ];
            for (id, value) in FORM_FIELDS.iter().zip(values) {
                self.set_field(id, value);
            }
        }

        fn record_from_form(&self) -> StudentRecord {
            StudentRecord {
                id: self.field("studentId"),
                name: self.field("name"),
                dob: self.field("dob"),
                center: self.field("center"),
                teacher: self.field("teacher"),
                goals: self.field("goals"),
                progress: self.field("progress"),
                updated: String::new(),
            }
        }

        fn render_list(&self, filter: &str) {
            let Some(ul) = self.document.get_element_by_id("studentsList") else {
                log::warn!("Missing #studentsList");
                return;
            };

            let students = self.repo.filter(filter);
            if students.is_empty() {
                ul.set_inner_html(
                    r#"<li class="text-sm text-gray-500">No students yet. Add one using the form.</li>"#,
                );
                return;
            }

            let mut html = String::new();
            for s in &students {
                let id = escape_html(&s.id);
                let dob = if s.dob.is_empty() {
                    String::new()
                } else {
                    format!("• {}", escape_html(&s.dob))
                };
                html.push_str(&format!(
                    r#"<li class="p-2 rounded-md flex items-center justify-between">
  <div class="flex-1">
    <div class="font-medium">{name}</div>
    <div class="text-xs text-gray-600">{center} {dob}</div>
  </div>
  <div class="flex gap-2 items-center ml-3">
    <button data-id="{id}" class="reportBtn px-2 py-1 rounded-md border text-sm" title="Open printable report">🖨️</button>
    <button data-id="{id}" class="editBtn px-2 py-1 rounded-md border text-sm" title="Edit">✏️</button>
    <button data-id="{id}" class="delBtn px-2 py-1 rounded-md border text-sm text-red-600" title="Delete">🗑️</button>
  </div>
</li>"#,
                    name = escape_html(s.display_name()),
                    center = escape_html(&s.center),
                ));
            }
            ul.set_inner_html(&html);
        }

        fn refresh(&self) {
            self.render_list(&self.search_query());
        }

        fn submit(&mut self) {
            let record = self.record_from_form();
            match self.repo.upsert(record) {
                Ok(saved) => {
                    log::info!("Saved student {}", saved.id);
                    self.refresh();
                    self.clear_form();
                }
                Err(e) => self.alert(&format!("Failed to save: {}", e)),
            }
        }

        fn edit(&self, id: &str) {
            match self.repo.find_by_id(id) {
                Ok(s) => {
                    self.fill_form(&s);
                    let opts = ScrollToOptions::new();
                    opts.set_top(0.0);
                    opts.set_behavior(ScrollBehavior::Smooth);
                    self.window.scroll_to_with_scroll_to_options(&opts);
                }
                Err(_) => self.alert("Student not found"),
            }
        }

        fn delete(&mut self, id: &str) {
            let confirmed = self
                .window
                .confirm_with_message("Delete this student? This cannot be undone.")
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            if let Err(e) = self.repo.delete(id) {
                self.alert(&format!("Failed to delete: {}", e));
            }
            self.refresh();
        }

        fn report(&self, id: &str) {
            let generated = String::from(
                js_sys::Date::new_0().to_locale_string("default", &JsValue::UNDEFINED),
            );
            let html = match self.repo.report(id, &generated) {
                Ok(html) => html,
                Err(_) => {
                    self.alert("Student not found");
                    return;
                }
            };
            let Some(doc) = self
                .window
                .open_with_url_and_target("", "_blank")
                .ok()
                .flatten()
                .and_then(|w| w.document())
            else {
                self.alert("Could not open the report window (pop-ups blocked?)");
                return;
            };
            if let Err(e) = doc.write_1(&html).and_then(|_| doc.close()) {
                log::error!("Failed to write report: {:?}", e);
            }
        }

        fn export(&self) -> Result<(), JsValue> {
            let json = self
                .repo
                .export_json()
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            let url = object_url(&json, "application/json")?;
            let a: HtmlAnchorElement = self.document.create_element("a")?.dyn_into()?;
            a.set_href(&url);
            a.set_download(EXPORT_FILE_NAME);
            a.click();
            Url::revoke_object_url(&url)?;
            log::info!("Exported students");
            Ok(())
        }

        fn import_text(&mut self, text: &str) {
            match self.repo.import_json(text) {
                Ok(count) => {
                    self.render_list("");
                    self.alert(&format!("Imported {} students.", count));
                }
                Err(e @ RecordError::Import(_)) => self.alert(&e.to_string()),
                Err(e) => self.alert(&format!("Failed to import: {}", e)),
            }
        }
    }

    fn object_url(content: &str, mime: &str) -> Result<String, JsValue> {
        let parts = js_sys::Array::of1(&JsValue::from_str(content));
        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
        Url::create_object_url_with_blob(&blob)
    }

    /// Open a file picker and import the chosen JSON file
    fn pick_import_file(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let input: HtmlInputElement = app
            .borrow()
            .document
            .create_element("input")?
            .dyn_into()?;
        input.set_type("file");
        input.set_accept("application/json");

        let picker = input.clone();
        let onchange = Closure::once_into_js(move |_event: Event| {
            let Some(file) = picker.files().and_then(|files| files.get(0)) else {
                return;
            };
            let reader = match FileReader::new() {
                Ok(reader) => reader,
                Err(e) => {
                    log::error!("FileReader unavailable: {:?}", e);
                    return;
                }
            };
            let loaded = reader.clone();
            let onload = Closure::once_into_js(move |_event: Event| {
                let text = loaded.result().ok().and_then(|v| v.as_string());
                match text {
                    Some(text) => app.borrow_mut().import_text(&text),
                    None => app.borrow().alert("Failed to import: file could not be read"),
                }
            });
            reader.set_onload(Some(onload.unchecked_ref()));
            if let Err(e) = reader.read_as_text(&file) {
                log::error!("Failed to read import file: {:?}", e);
            }
        });
        input.set_onchange(Some(onchange.unchecked_ref()));
        input.click();
        Ok(())
    }

    fn listen(
        document: &Document,
        id: &str,
        event: &str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing #{}", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Case Conf starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        // Without LocalStorage the page still renders; saves report the failure
        let storage: Box<dyn KeyValueStorage> = match LocalStorage::new() {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, changes cannot be saved");
                Box::new(UnavailableStorage)
            }
        };
        let repo = RecordRepository::new(RecordStore::new(storage));

        let app = Rc::new(RefCell::new(App {
            repo,
            window,
            document: document.clone(),
        }));
        app.borrow().render_list("");

        {
            let app = app.clone();
            listen(&document, "studentForm", "submit", move |event: Event| {
                event.prevent_default();
                app.borrow_mut().submit();
            })?;
        }
        {
            let app = app.clone();
            listen(&document, "clearBtn", "click", move |_event: Event| {
                app.borrow().clear_form();
            })?;
        }
        {
            let app = app.clone();
            listen(&document, "exportBtn", "click", move |_event: Event| {
                if let Err(e) = app.borrow().export() {
                    log::error!("Export failed: {:?}", e);
                }
            })?;
        }
        {
            let app = app.clone();
            listen(&document, "importBtn", "click", move |_event: Event| {
                if let Err(e) = pick_import_file(app.clone()) {
                    log::error!("Import failed: {:?}", e);
                }
            })?;
        }
        {
            let app = app.clone();
            listen(&document, "search", "input", move |_event: Event| {
                app.borrow().refresh();
            })?;
        }
        // List buttons are re-rendered often; one delegated listener serves them all
        {
            let app = app.clone();
            listen(&document, "studentsList", "click", move |event: Event| {
                let Some(button) = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("button[data-id]").ok().flatten())
                else {
                    return;
                };
                let Some(id) = button.get_attribute("data-id") else {
                    return;
                };
                let class = button.class_name();
                if class.contains("editBtn") {
                    app.borrow().edit(&id);
                } else if class.contains("delBtn") {
                    app.borrow_mut().delete(&id);
                } else if class.contains("reportBtn") {
                    app.borrow().report(&id);
                }
            })?;
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::{Parser, Subcommand};

    use case_conf::consts::DEFAULT_DATA_DIR;
    use case_conf::platform::FileStorage;
    use case_conf::{RecordRepository, RecordStore, StudentRecord};

    #[derive(Parser)]
    #[command(name = "case-conf", about = "Student records and case conference reports")]
    struct Cli {
        /// Directory holding the stored records
        #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// List students whose name or center contains QUERY
        List { query: Option<String> },
        /// Print one student as JSON
        Show { id: String },
        /// Create a student, or update the one with --id
        Save {
            #[arg(long)]
            id: Option<String>,
            #[arg(long)]
            name: Option<String>,
            #[arg(long)]
            dob: Option<String>,
            #[arg(long)]
            center: Option<String>,
            #[arg(long)]
            teacher: Option<String>,
            #[arg(long)]
            goals: Option<String>,
            #[arg(long)]
            progress: Option<String>,
        },
        /// Delete a student
        Delete { id: String },
        /// Write all students as JSON (stdout unless --out)
        Export {
            #[arg(long)]
            out: Option<PathBuf>,
        },
        /// Replace all students with the contents of a JSON file
        Import { file: PathBuf },
        /// Write the printable HTML report for a student (stdout unless --out)
        Report {
            id: String,
            #[arg(long)]
            out: Option<PathBuf>,
        },
    }

    fn emit(content: &str, out: Option<PathBuf>) -> anyhow::Result<()> {
        match out {
            Some(path) => {
                std::fs::write(&path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Wrote {}", path.display());
            }
            None => println!("{}", content),
        }
        Ok(())
    }

    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();

        let mut repo = RecordRepository::new(RecordStore::new(FileStorage::new(&cli.data_dir)));

        match cli.command {
            Command::List { query } => {
                let students = repo.filter(query.as_deref().unwrap_or(""));
                if students.is_empty() {
                    println!("No students yet. Add one with `case-conf save`.");
                }
                for s in students {
                    println!("{}  {}  {}  {}", s.id, s.display_name(), s.center, s.dob);
                }
            }
            Command::Show { id } => {
                let student = repo.find_by_id(&id)?;
                println!("{}", serde_json::to_string_pretty(&student)?);
            }
            Command::Save {
                id,
                name,
                dob,
                center,
                teacher,
                goals,
                progress,
            } => {
                // Updates start from the stored record so omitted flags keep their values
                let mut record = match id {
                    Some(id) => repo.find_by_id(&id).unwrap_or(StudentRecord {
                        id,
                        ..Default::default()
                    }),
                    None => StudentRecord::default(),
                };
                let fields = [
                    (&mut record.name, name),
                    (&mut record.dob, dob),
                    (&mut record.center, center),
                    (&mut record.teacher, teacher),
                    (&mut record.goals, goals),
                    (&mut record.progress, progress),
                ];
                for (field, value) in fields {
                    if let Some(value) = value {
                        *field = value;
                    }
                }
                let saved = repo.upsert(record)?;
                println!("Saved {}", saved.id);
            }
            Command::Delete { id } => {
                if repo.delete(&id)? {
                    println!("Deleted {}", id);
                } else {
                    println!("No student with id {}", id);
                }
            }
            Command::Export { out } => emit(&repo.export_json()?, out)?,
            Command::Import { file } => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?;
                let count = repo.import_json(&text)?;
                println!("Imported {} students.", count);
            }
            Command::Report { id, out } => {
                let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
                emit(&repo.report(&id, &generated)?, out)?;
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Case Conf (native) starting...");

    if let Err(e) = cli::run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
