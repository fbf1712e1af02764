use actix_cors::Cors;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, dev::Server, middleware::Logger, web, App, HttpServer};
use clap::Parser;
use log::{log, Level};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};

use quill_api::args::RunArgs;
use quill_api::migrator::Migrator;
use quill_api::service::{self, DbConnection};

async fn setup_database(
    db_url: &str,
    db_name: &str,
    refresh: bool,
) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let mut c_opt = ConnectOptions::new(db_url);
    c_opt.sqlx_logging(false);

    let db = Database::connect(c_opt).await?;

    let db = match db.get_database_backend() {
        DbBackend::MySql => {
            db.execute(Statement::from_string(
                db.get_database_backend(),
                format!("CREATE DATABASE IF NOT EXISTS `{}`;", db_name),
            ))
            .await?;
            let url = format!("{}/{}", db_url, db_name);
            Database::connect(&url).await?
        }
        DbBackend::Postgres => panic!("postgresql not supported"),
        DbBackend::Sqlite => db,
    };
    if refresh {
        Migrator::fresh(&db).await?;
    }
    Migrator::up(&db, None).await?;

    Ok(db)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = RunArgs::parse();

    log!(
        Level::Info,
        "Running quill server on {}:{}\nwith database url: {} and database name: {}",
        &args.address,
        &args.port,
        &args.db,
        &args.db_name
    );
    create_and_run_server(&args).await?.await?;
    Ok(())
}

async fn create_and_run_server(args: &RunArgs) -> std::io::Result<Server> {
    let secret_key = Key::generate();
    let db = setup_database(&args.db, &args.db_name, args.fresh)
        .await
        .unwrap_or_else(|e| panic!("database setup error: {}", e));

    let db = DbConnection::new(db);

    Ok(HttpServer::new(move || {
        let cors = Cors::permissive();
        App::new()
            .configure(service::configure_services)
            .app_data(web::Data::new(db.clone()))
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .wrap(Logger::default())
            .wrap(cors)
    })
    .bind((args.address.clone(), args.port))?
    .run())
}
