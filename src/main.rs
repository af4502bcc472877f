use stage_net_plan::build_stage_plan;
use stage_net_plan::config::{
    apply_allow_list_override, load_environment, stage_from_env, EDGE_ALLOW_LIST_VAR,
    STAGE_CONFIG_VAR,
};
use stage_net_plan::output::{
    describe_decision, init_logging, print_summary, subnet_print, write_plan, LOG_CONFIG_FILE,
};
use stage_net_plan::processing::edge_filter;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging(LOG_CONFIG_FILE).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let stage = stage_from_env()?;
    let config_file = std::env::var(STAGE_CONFIG_VAR).ok();
    let mut env = load_environment(stage, config_file.as_deref())?;
    apply_allow_list_override(&mut env, std::env::var(EDGE_ALLOW_LIST_VAR).ok().as_deref());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            let plan = build_stage_plan(stage, &env)?;
            subnet_print(&plan.vpc);
            print_summary(&plan);
            let path = write_plan(&plan, Path::new("."))?;
            log::info!("#End main() plan written to {}", path.display());
        }
        [cmd, client_ip, uri] if cmd == "check" => {
            let cdn = env.cdn.clone().unwrap_or_else(|| {
                log::warn!("stage {stage} has no CDN settings, checking with an empty allow-list");
                stage_net_plan::config::CdnSettings {
                    domain_name: String::new(),
                    allow_list: vec![],
                    empty_allow_list: Default::default(),
                }
            });
            let decision = edge_filter(&cdn)?.evaluate(client_ip, uri);
            log::info!("{}", describe_decision(&decision));
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        _ => {
            return Err("usage: stage-net-plan [check <client-ip> <uri>]".into());
        }
    }

    Ok(())
}
