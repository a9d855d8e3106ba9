use canyon_cams::config::{self, Settings};
use canyon_cams::server;



#[rocket::main]
async fn main() -> anyhow::Result<()> {
	let matches = config::command().get_matches();
	let settings = Settings::from_matches(&matches);

	let _rocket = server::build(&settings)?
		.launch()
		.await?;

	anyhow::Ok(())
}
