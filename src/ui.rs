// UI layer: provides a simple interactive menu using `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.
//
// Formatting lives in pure `render_*` functions over the model types so
// the output contract can be tested without a terminal; the handlers only
// prompt, call the API and print.

use crate::api::ApiClient;
use crate::model::{Action, Alert, Device, Room, Routine};
use anyhow::{bail, Result};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Map;
use std::time::Duration;

/// Main interactive menu. Receives an `ApiClient` instance and runs the
/// read-dispatch-print loop until the user chooses "0. Sair".
///
/// Handler errors (transport failures, blank required input) are printed
/// as a single `[ERRO]` line and the loop returns to the menu; nothing a
/// handler does is fatal to the process.
pub fn main_menu(api: ApiClient) -> Result<()> {
    print_banner(&api);
    loop {
        print_menu();
        let choice: String = Input::new()
            .with_prompt("Escolha uma opcao")
            .allow_empty(true)
            .interact_text()?;
        match choice.trim() {
            "0" => {
                println!("\nEncerrando cliente...");
                break;
            }
            "1" => report(handle_list_devices(&api)),
            "2" => report(handle_get_device(&api)),
            "3" => report(handle_update_device(&api)),
            "4" => report(handle_execute_action(&api)),
            "5" => report(handle_list_routines(&api)),
            "6" => report(handle_create_routine(&api)),
            "7" => report(handle_list_alerts(&api)),
            "8" => report(handle_get_room(&api)),
            _ => println!("\n[ERRO] Opcao invalida! Tente novamente."),
        }
        pause()?;
    }
    Ok(())
}

fn print_banner(api: &ApiClient) {
    println!("========================================");
    println!("Cliente Remoto Smart Home (API REST)");
    println!("========================================");
    println!("Conectado a: {}", api.base_url());
}

fn print_menu() {
    println!("\n========================================");
    println!("MENU PRINCIPAL");
    println!("========================================");
    println!("1. Listar dispositivos");
    println!("2. Obter dispositivo por ID");
    println!("3. Atualizar dispositivo");
    println!("4. Executar acao em dispositivo");
    println!("5. Listar rotinas");
    println!("6. Criar rotina");
    println!("7. Listar alertas");
    println!("8. Obter comodo por nome");
    println!("0. Sair");
    println!("========================================");
}

/// Print a handler failure as the single error line the shell promises.
fn report(result: Result<()>) {
    if let Err(err) = result {
        eprintln!("\n[ERRO] {err:#}");
    }
}

fn handle_list_devices(api: &ApiClient) -> Result<()> {
    println!("\n--- Listando Dispositivos ---");
    let devices = with_spinner("Consultando dispositivos...", || api.list_devices())?;
    print!("{}", render_device_list(&devices));
    Ok(())
}

fn handle_get_device(api: &ApiClient) -> Result<()> {
    println!("\n--- Obter Dispositivo ---");
    let id = prompt_required("Digite o ID do dispositivo", "ID")?;
    match with_spinner("Consultando dispositivo...", || api.get_device(&id))? {
        Some(device) => {
            println!("\nDispositivo encontrado:");
            print!("{}", render_device_details(&device));
        }
        None => println!("\n[ERRO] Dispositivo nao encontrado!"),
    }
    Ok(())
}

fn handle_update_device(api: &ApiClient) -> Result<()> {
    println!("\n--- Atualizar Dispositivo ---");
    let id = prompt_required("Digite o ID do dispositivo", "ID")?;
    let mut device = match with_spinner("Consultando dispositivo...", || api.get_device(&id))? {
        Some(device) => device,
        None => {
            println!("[ERRO] Dispositivo nao encontrado!");
            return Ok(());
        }
    };

    println!("\nDispositivo atual:");
    println!("  Nome: {}", or_na(&device.name));
    println!("  Online: {}", online_label(device.online));

    // Enter keeps the current value on both prompts.
    let new_name = prompt_optional("Novo nome (Enter para manter)")?;
    if !new_name.is_empty() {
        device.name = Some(new_name);
    }
    match prompt_optional("Online? (s/n, Enter para manter)")?
        .to_lowercase()
        .as_str()
    {
        "s" => device.online = Some(true),
        "n" => device.online = Some(false),
        _ => {}
    }

    match with_spinner("Atualizando dispositivo...", || {
        api.update_device(&id, &device)
    })? {
        Some(updated) => {
            println!("\n[SUCESSO] Dispositivo atualizado!");
            println!("  Nome: {}", or_na(&updated.name));
            println!("  Online: {}", online_label(updated.online));
        }
        None => println!("\n[ERRO] Falha ao atualizar dispositivo!"),
    }
    Ok(())
}

fn handle_execute_action(api: &ApiClient) -> Result<()> {
    println!("\n--- Executar Acao ---");
    let id = prompt_required("Digite o ID do dispositivo", "ID")?;
    let command = prompt_required("Digite o comando (ligar/desligar)", "Comando")?;
    match with_spinner("Executando acao...", || api.execute_action(&id, &command))? {
        Some(device) => {
            println!("\n[SUCESSO] Acao executada!");
            println!("  Dispositivo: {}", or_na(&device.name));
            println!("  Online: {}", online_label(device.online));
        }
        None => println!("\n[ERRO] Falha ao executar acao!"),
    }
    Ok(())
}

fn handle_list_routines(api: &ApiClient) -> Result<()> {
    println!("\n--- Listando Rotinas ---");
    let routines = with_spinner("Consultando rotinas...", || api.list_routines())?;
    print!("{}", render_routine_list(&routines));
    Ok(())
}

fn handle_create_routine(api: &ApiClient) -> Result<()> {
    println!("\n--- Criar Rotina ---");
    let name = prompt_required("Nome da rotina", "Nome")?;

    // The action targets an existing device, so list them to pick from.
    let devices = with_spinner("Carregando dispositivos...", || api.list_devices())?;
    if devices.is_empty() {
        println!("[ERRO] Nenhum dispositivo disponivel!");
        return Ok(());
    }
    println!("\nDispositivos disponiveis:");
    for (i, device) in devices.iter().enumerate() {
        println!("{}. {} ({})", i + 1, or_na(&device.name), or_na(&device.id));
    }

    let choice = prompt_required("Escolha o numero do dispositivo", "Numero")?;
    let index = parse_device_choice(&choice, devices.len())?;
    let command = prompt_required("Comando (ligar/desligar)", "Comando")?;

    let routine = Routine {
        id: None,
        name: Some(name),
        actions: vec![Action {
            device_id: devices[index].id.clone().unwrap_or_default(),
            command,
            parameters: Map::new(),
        }],
        start_time: None,
    };
    match with_spinner("Criando rotina...", || api.create_routine(&routine))? {
        Some(created) => {
            println!("\n[SUCESSO] Rotina criada!");
            println!("  Nome: {}", or_na(&created.name));
            println!("  ID: {}", or_na(&created.id));
        }
        None => println!("\n[ERRO] Falha ao criar rotina!"),
    }
    Ok(())
}

fn handle_list_alerts(api: &ApiClient) -> Result<()> {
    println!("\n--- Listando Alertas ---");
    let alerts = with_spinner("Consultando alertas...", || api.list_alerts())?;
    print!("{}", render_alert_list(&alerts));
    Ok(())
}

fn handle_get_room(api: &ApiClient) -> Result<()> {
    println!("\n--- Obter Comodo ---");
    let name = prompt_required("Digite o nome do comodo", "Nome")?;
    match with_spinner("Consultando comodo...", || api.get_room(&name))? {
        Some(room) => {
            println!("\nComodo encontrado:");
            print!("{}", render_room(&room));
        }
        None => println!("\n[ERRO] Comodo nao encontrado!"),
    }
    Ok(())
}

/// Prompt for a value that must not be blank. Rejected locally, before any
/// network call, when the user leaves it empty.
fn prompt_required(prompt: &str, field: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim().to_string();
    if value.is_empty() {
        bail!("{field} nao pode ser vazio!");
    }
    Ok(value)
}

/// Prompt for a value where Enter means "keep the current one".
fn prompt_optional(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn pause() -> Result<()> {
    println!();
    let _: String = Input::new()
        .with_prompt("Pressione Enter para continuar")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

/// Turn a typed 1-based device selection into a 0-based index, rejecting
/// anything outside [1, count] without touching the network.
fn parse_device_choice(input: &str, count: usize) -> Result<usize> {
    let number: usize = match input.trim().parse() {
        Ok(n) => n,
        Err(_) => bail!("Escolha invalida!"),
    };
    if number < 1 || number > count {
        bail!("Escolha invalida!");
    }
    Ok(number - 1)
}

/// Run `f` while a spinner is on screen. Only the blocking network call
/// happens under the spinner; prompts stay outside it.
fn with_spinner<T>(message: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    let result = f();
    spinner.finish_and_clear();
    result
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn online_label(online: Option<bool>) -> &'static str {
    match online {
        Some(true) => "Sim",
        Some(false) => "Nao",
        None => "N/A",
    }
}

/// Numbered device list, one block per device.
pub fn render_device_list(devices: &[Device]) -> String {
    let mut out = format!("Total: {} dispositivos\n\n", devices.len());
    if devices.is_empty() {
        out.push_str("Nenhum dispositivo encontrado.\n");
        return out;
    }
    for (i, device) in devices.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, or_na(&device.name)));
        out.push_str(&format!("   ID: {}\n", or_na(&device.id)));
        out.push_str(&format!("   Tipo: {}\n", or_na(&device.kind)));
        out.push_str(&format!("   Online: {}\n", online_label(device.online)));
        out.push_str(&format!("   Comodo: {}\n\n", or_na(&device.room)));
    }
    out
}

/// Detail block for a single device, indented for the "found" views.
pub fn render_device_details(device: &Device) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Nome: {}\n", or_na(&device.name)));
    out.push_str(&format!("  ID: {}\n", or_na(&device.id)));
    out.push_str(&format!("  Tipo: {}\n", or_na(&device.kind)));
    out.push_str(&format!("  Online: {}\n", online_label(device.online)));
    out.push_str(&format!("  Comodo: {}\n", or_na(&device.room)));
    out.push_str(&format!("  Descricao: {}\n", or_na(&device.description)));
    out
}

/// Numbered routine list; the start time line only appears when the
/// server sent one.
pub fn render_routine_list(routines: &[Routine]) -> String {
    let mut out = format!("Total: {} rotinas\n\n", routines.len());
    if routines.is_empty() {
        out.push_str("Nenhuma rotina encontrada.\n");
        return out;
    }
    for (i, routine) in routines.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, or_na(&routine.name)));
        out.push_str(&format!("   ID: {}\n", or_na(&routine.id)));
        out.push_str(&format!("   Acoes: {}\n", routine.actions.len()));
        if let Some(start) = &routine.start_time {
            out.push_str(&format!("   Horario: {start}\n"));
        }
        out.push('\n');
    }
    out
}

/// Numbered alert list.
pub fn render_alert_list(alerts: &[Alert]) -> String {
    let mut out = format!("Total: {} alertas\n\n", alerts.len());
    if alerts.is_empty() {
        out.push_str("Nenhum alerta encontrado.\n");
        return out;
    }
    for (i, alert) in alerts.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, or_na(&alert.title)));
        out.push_str(&format!("   Mensagem: {}\n", or_na(&alert.message)));
        out.push_str(&format!("   Comodo: {}\n\n", or_na(&alert.room)));
    }
    out
}

/// Room block: name, device count and one line per device.
pub fn render_room(room: &Room) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Nome: {}\n", or_na(&room.name)));
    out.push_str(&format!("  Dispositivos: {}\n", room.devices.len()));
    for device in &room.devices {
        out.push_str(&format!("    - {}\n", or_na(&device.name)));
    }
    out
}
